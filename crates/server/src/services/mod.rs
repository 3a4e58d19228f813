//! External service clients and in-process stores.

pub mod auth;
pub mod email;
pub mod geocode;
pub mod images;
pub mod otp;
pub mod payments;

pub use auth::AuthError;
pub use email::{EmailError, EmailService};
pub use geocode::{GeocodeError, GeocodingClient, ResolvedAddress};
pub use images::{HostedImage, ImageHostClient, ImageHostError};
pub use otp::{OtpOutcome, OtpStore};
pub use payments::{GatewayOrder, PaymentClient, PaymentError};
