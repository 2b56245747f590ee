pub mod auth;
pub mod resource;
pub mod service;

pub use auth::{CookieJarToken, NoToken, RequestInterceptor, SharedToken, StaticToken, TokenSource};
pub use resource::ResourceService;
pub use service::{ApiConfig, ApiService, RequestOptions};
