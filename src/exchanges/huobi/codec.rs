use crate::core::errors::{ExchangeError, VenueError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Render a JSON scalar the way the venue's string-keyed tables expect.
/// Contract endpoints report the same fields as numbers that spot reports
/// as strings.
pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// v1-style envelope used by the spot, market-data and contract groups.
/// Spot errors spell the code hyphenated and as a string; the contract
/// host spells it underscored and numeric. Both are captured.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HuobiResponse<T> {
    pub status: Option<String>,
    #[serde(rename = "err-code")]
    pub err_code: Option<String>,
    #[serde(rename = "err-msg")]
    pub err_msg: Option<String>,
    #[serde(rename = "err_code")]
    pub err_code_contract: Option<Value>,
    #[serde(rename = "err_msg")]
    pub err_msg_contract: Option<String>,
    pub ch: Option<String>,
    pub ts: Option<i64>,
    pub data: Option<T>,
}

impl<T> HuobiResponse<T> {
    /// Classify an error envelope or hand back the payload. Classification
    /// runs before any payload inspection; a success envelope without a
    /// payload is itself a venue failure.
    pub fn into_result(self, operation: &str) -> Result<T, ExchangeError> {
        let code = self
            .err_code
            .or_else(|| self.err_code_contract.as_ref().and_then(value_to_string));
        let message = self.err_msg.or(self.err_msg_contract);

        if self.status.as_deref() == Some("error") {
            return Err(classify_error(operation, code, message));
        }

        self.data.ok_or_else(|| {
            ExchangeError::ExchangeFailure(VenueError::new(
                operation,
                code,
                Some("response carried no data".to_string()),
            ))
        })
    }
}

/// Envelope variant for the market endpoints that nest their payload
/// under `tick` instead of `data`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HuobiTickResponse<T> {
    pub status: Option<String>,
    #[serde(rename = "err-code")]
    pub err_code: Option<String>,
    #[serde(rename = "err-msg")]
    pub err_msg: Option<String>,
    pub ch: Option<String>,
    pub ts: Option<i64>,
    pub tick: Option<T>,
}

impl<T> HuobiTickResponse<T> {
    pub fn into_result(self, operation: &str) -> Result<T, ExchangeError> {
        if self.status.as_deref() == Some("error") {
            return Err(classify_error(operation, self.err_code, self.err_msg));
        }

        self.tick.ok_or_else(|| {
            ExchangeError::ExchangeFailure(VenueError::new(
                operation,
                self.err_code,
                Some("response carried no tick".to_string()),
            ))
        })
    }
}

/// v2-style envelope: numeric `code` with 200 marking success
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HuobiV2Response<T> {
    pub code: Option<i64>,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> HuobiV2Response<T> {
    pub fn into_result(self, operation: &str) -> Result<T, ExchangeError> {
        match self.code {
            Some(200) | None => self.data.ok_or_else(|| {
                ExchangeError::ExchangeFailure(VenueError::new(
                    operation,
                    None,
                    Some("response carried no data".to_string()),
                ))
            }),
            Some(code) => Err(classify_error(
                operation,
                Some(code.to_string()),
                self.message,
            )),
        }
    }
}

/// Map an error envelope onto the canonical taxonomy: exact match on the
/// error code first, exact match on the error message second, otherwise
/// the generic exchange failure carrying the raw pair.
pub fn classify_error(
    operation: &str,
    code: Option<String>,
    message: Option<String>,
) -> ExchangeError {
    let detail = VenueError::new(operation, code.clone(), message.clone());

    if let Some(code) = code.as_deref() {
        if let Some(classified) = lookup(code, detail.clone()) {
            return classified;
        }
    }
    if let Some(message) = message.as_deref() {
        if let Some(classified) = lookup(message, detail.clone()) {
            return classified;
        }
    }

    ExchangeError::ExchangeFailure(detail)
}

/// One table serves both lookup passes, mirroring the venue's habit of
/// reporting some conditions only through the message field.
fn lookup(key: &str, detail: VenueError) -> Option<ExchangeError> {
    Some(match key {
        "bad-request" | "invalid-parameter" => ExchangeError::BadRequest(detail),
        "api-not-support-temp-addr" => ExchangeError::PermissionDenied(detail),
        "timeout" => ExchangeError::RateLimited(detail),
        "gateway-internal-error" | "order-update-error" => ExchangeError::Unavailable(detail),
        "system-maintenance" => ExchangeError::UnderMaintenance(detail),
        "account-frozen-balance-insufficient-error" => ExchangeError::InsufficientFunds(detail),
        "invalid-amount"
        | "order-limitorder-amount-min-error"
        | "order-limitorder-amount-max-error"
        | "order-marketorder-amount-min-error"
        | "order-limitorder-price-min-error"
        | "order-limitorder-price-max-error" => ExchangeError::InvalidOrder(detail),
        "order-orderstate-error" | "order-queryorder-invalid" | "base-record-invalid" => {
            ExchangeError::OrderNotFound(detail)
        }
        "api-signature-check-failed" | "api-signature-not-valid" => {
            ExchangeError::AuthRejected(detail)
        }
        "invalid symbol" | "base-symbol-trade-disabled" => ExchangeError::BadSymbol(detail),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_classifies_by_code() {
        let response: HuobiResponse<Vec<i32>> = serde_json::from_str(
            r#"{"status":"error","err-code":"order-orderstate-error","err-msg":"Incorrect order state"}"#,
        )
        .unwrap();

        let err = response.into_result("order_info").unwrap_err();
        match err {
            ExchangeError::OrderNotFound(detail) => {
                assert_eq!(detail.operation, "order_info");
                assert_eq!(detail.code.as_deref(), Some("order-orderstate-error"));
            }
            other => panic!("expected OrderNotFound, got {other:?}"),
        }
    }

    #[test]
    fn error_envelope_falls_back_to_message_match() {
        let err = classify_error(
            "ticker",
            Some("invalid-unknown".to_string()),
            Some("invalid symbol".to_string()),
        );
        assert!(matches!(err, ExchangeError::BadSymbol(_)));
    }

    #[test]
    fn unmatched_errors_keep_the_raw_pair() {
        let err = classify_error(
            "place_order",
            Some("some-new-code".to_string()),
            Some("something else".to_string()),
        );
        match err {
            ExchangeError::ExchangeFailure(detail) => {
                assert_eq!(detail.code.as_deref(), Some("some-new-code"));
                assert_eq!(detail.message.as_deref(), Some("something else"));
            }
            other => panic!("expected ExchangeFailure, got {other:?}"),
        }
    }

    #[test]
    fn contract_numeric_codes_are_captured() {
        let response: HuobiResponse<Vec<i32>> = serde_json::from_str(
            r#"{"status":"error","err_code":1033,"err_msg":"The period is error."}"#,
        )
        .unwrap();

        let err = response.into_result("ohlcv").unwrap_err();
        match err {
            ExchangeError::ExchangeFailure(detail) => {
                assert_eq!(detail.code.as_deref(), Some("1033"));
                assert_eq!(detail.message.as_deref(), Some("The period is error."));
            }
            other => panic!("expected ExchangeFailure, got {other:?}"),
        }
    }

    #[test]
    fn success_envelope_yields_data() {
        let response: HuobiResponse<Vec<i32>> =
            serde_json::from_str(r#"{"status":"ok","data":[1,2,3]}"#).unwrap();
        assert_eq!(response.into_result("markets").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn success_without_payload_is_a_failure() {
        let response: HuobiResponse<Vec<i32>> =
            serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(matches!(
            response.into_result("markets").unwrap_err(),
            ExchangeError::ExchangeFailure(_)
        ));

        let response: HuobiTickResponse<Vec<i32>> =
            serde_json::from_str(r#"{"status":"ok","ts":1}"#).unwrap();
        assert!(matches!(
            response.into_result("order_book").unwrap_err(),
            ExchangeError::ExchangeFailure(_)
        ));
    }

    #[test]
    fn v2_envelope_checks_the_numeric_code() {
        let response: HuobiV2Response<Vec<i32>> =
            serde_json::from_str(r#"{"code":200,"data":[7]}"#).unwrap();
        assert_eq!(response.into_result("deposit_address").unwrap(), vec![7]);

        let response: HuobiV2Response<Vec<i32>> =
            serde_json::from_str(r#"{"code":2002,"message":"invalid field value"}"#).unwrap();
        let err = response.into_result("deposit_address").unwrap_err();
        match err {
            ExchangeError::ExchangeFailure(detail) => {
                assert_eq!(detail.code.as_deref(), Some("2002"));
            }
            other => panic!("expected ExchangeFailure, got {other:?}"),
        }
    }
}
