//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::MirakleConfig;
use crate::services::{EmailService, GeocodingClient, ImageHostClient, OtpStore, PaymentClient};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("email service: {0}")]
    Email(#[from] lettre::transport::smtp::Error),
    #[error("image host client: {0}")]
    ImageHost(#[from] crate::services::ImageHostError),
    #[error("payment client: {0}")]
    Payment(#[from] crate::services::PaymentError),
    #[error("geocoding client: {0}")]
    Geocode(#[from] crate::services::GeocodeError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and service clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: MirakleConfig,
    pool: PgPool,
    mailer: EmailService,
    images: ImageHostClient,
    payments: PaymentClient,
    geocoder: Option<GeocodingClient>,
    otp: OtpStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if any service client fails to build from the
    /// configuration.
    pub fn new(config: MirakleConfig, pool: PgPool) -> Result<Self, StateError> {
        let mailer = EmailService::new(&config.email)?;
        let images = ImageHostClient::new(&config.image_host)?;
        let payments = PaymentClient::new(&config.payment)?;
        let geocoder = config
            .geocoding
            .as_ref()
            .map(GeocodingClient::new)
            .transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                mailer,
                images,
                payments,
                geocoder,
                otp: OtpStore::new(),
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &MirakleConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the email service.
    #[must_use]
    pub fn mailer(&self) -> &EmailService {
        &self.inner.mailer
    }

    /// Get a reference to the image host client.
    #[must_use]
    pub fn images(&self) -> &ImageHostClient {
        &self.inner.images
    }

    /// Get a reference to the payment gateway client.
    #[must_use]
    pub fn payments(&self) -> &PaymentClient {
        &self.inner.payments
    }

    /// Get the geocoding client, if configured.
    #[must_use]
    pub fn geocoder(&self) -> Option<&GeocodingClient> {
        self.inner.geocoder.as_ref()
    }

    /// Get a reference to the OTP store.
    #[must_use]
    pub fn otp(&self) -> &OtpStore {
        &self.inner.otp
    }
}
