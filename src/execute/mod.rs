//! Request execution subsystem.
//!
//! # Data Flow
//! ```text
//! RequestDraft (editor state, enabled flags)
//!     → draft.rs (drop disabled entries)
//!     → OutboundRequestSpec (what /api/execute receives)
//!     → normalize.rs (method, scheme, header merge, body selection)
//!     → ResolvedRequest
//!     → executor.rs (reqwest call, every status accepted, timed)
//!     → envelope.rs (success envelope, or error envelope on failure)
//! ```
//!
//! # Design Decisions
//! - Normalization is pure; all I/O lives in the executor
//! - 4xx/5xx responses are results, not errors
//! - Validation and transport failures are distinct error variants
//! - No state is kept between executions

pub mod draft;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod normalize;
pub mod service;
pub mod spec;

pub use draft::{BodyMode, KeyValueEntry, RequestDraft};
pub use envelope::{ErrorEnvelope, FailureKind, RequestInfo, ResponseEnvelope, SuccessEnvelope};
pub use error::{ExecuteError, TransportError, TransportErrorKind, ValidationError};
pub use executor::{HttpExecutor, TransportResponse};
pub use normalize::{normalize, Payload, ResolvedRequest};
pub use service::ExecuteService;
pub use spec::{Auth, HttpMethod, KeyValues, OutboundRequestSpec};
