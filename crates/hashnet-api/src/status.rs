//! Response codes returned by node prechecks and transaction receipts

use std::fmt;

/// Status reported by a node, either synchronously as a precheck code or
/// asynchronously inside a receipt once consensus is reached.
///
/// Generated from `ResponseCodeEnum` in the node schema.
pub use crate::proto::ResponseCodeEnum as ResponseCode;

impl ResponseCode {
    /// Decode a raw code, returning the raw value back when it is unknown.
    pub fn from_code(code: i32) -> Result<Self, i32> {
        Self::try_from(code).map_err(|_| code)
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_round_trip_names() {
        assert_eq!(ResponseCode::from_code(0), Ok(ResponseCode::Ok));
        assert_eq!(ResponseCode::from_code(12), Ok(ResponseCode::Busy));
        assert_eq!(ResponseCode::from_code(22), Ok(ResponseCode::Success));
        assert_eq!(
            ResponseCode::from_code(69),
            Ok(ResponseCode::PlatformTransactionNotCreated)
        );
        assert_eq!(
            ResponseCode::from_str_name("PLATFORM_NOT_ACTIVE"),
            Some(ResponseCode::PlatformNotActive)
        );
    }

    #[test]
    fn test_unknown_code_is_returned() {
        assert_eq!(ResponseCode::from_code(9999), Err(9999));
        assert_eq!(ResponseCode::from_str_name("NOT_A_CODE"), None);
    }

    #[test]
    fn test_display_uses_wire_name() {
        assert_eq!(ResponseCode::InvalidNodeAccount.to_string(), "INVALID_NODE_ACCOUNT");
        assert_eq!(ResponseCode::ReceiptNotFound.to_string(), "RECEIPT_NOT_FOUND");
    }
}
