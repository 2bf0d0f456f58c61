use thiserror::Error;

/// Every failure the announcer can hit. All of them are fatal to the process;
/// only `main` decides to exit.
#[derive(Debug, Error)]
pub enum AnnounceError {
    #[error("{0}")]
    Validation(String),

    #[error("network interface {0} not found")]
    InterfaceNotFound(String),

    #[error("No IP for interface {0}")]
    NoAddressBound(String),

    /// The OS interface table could not be read
    #[error("No IP for interface {interface}: {reason}")]
    AddressListing { interface: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures reported by the coordination store client
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid etcd address {addr}: {reason}")]
    InvalidAddress { addr: String, reason: String },

    #[error("request to etcd failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store answered with an error document, e.g. `{"errorCode":102,...}`
    #[error("etcd rejected the write ({status}): {message} [errorCode {error_code}] {cause}")]
    Rejected {
        status: u16,
        error_code: u32,
        message: String,
        cause: String,
    },

    #[error("unexpected response from etcd ({status}): {body}")]
    InvalidResponse { status: u16, body: String },
}

impl AnnounceError {
    /// Validation failures are reported together with the usage text.
    pub fn is_usage(&self) -> bool {
        matches!(self, AnnounceError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_converts() {
        let err: AnnounceError = StoreError::InvalidResponse {
            status: 500,
            body: "oops".to_string(),
        }
        .into();

        assert!(matches!(err, AnnounceError::Store(_)));
        assert!(!err.is_usage());
        assert_eq!(err.to_string(), "unexpected response from etcd (500): oops");
    }

    #[test]
    fn test_rejected_message() {
        let err = StoreError::Rejected {
            status: 403,
            error_code: 110,
            message: "The request requires user authentication".to_string(),
            cause: "Insufficient credentials".to_string(),
        };

        let text = err.to_string();
        assert!(text.contains("403"));
        assert!(text.contains("errorCode 110"));
        assert!(text.contains("Insufficient credentials"));
    }

    #[test]
    fn test_interface_errors() {
        assert_eq!(
            AnnounceError::NoAddressBound("eth9".to_string()).to_string(),
            "No IP for interface eth9"
        );
        assert!(AnnounceError::Validation("x".to_string()).is_usage());
    }
}
