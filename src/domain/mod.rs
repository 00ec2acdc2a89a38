pub mod entities;
pub mod errors;
pub mod order_builder;
pub mod signature;
pub mod value_objects;

pub use entities::{
    AccessToken, AppCredentials, ClientPaymentParams, LoginSession, OrderRequest, QrCodeOutcome,
    QrCodeRequest, SignedGatewayPayload,
};
pub use errors::{DomainError, DomainResult};
pub use order_builder::PaymentOrderBuilder;
pub use value_objects::{EnvVersion, Money, Secret, SignType, TradeType};
