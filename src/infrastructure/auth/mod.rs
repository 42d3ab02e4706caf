pub mod middleware;
pub mod request_id;

pub use middleware::{admin_middleware, auth_middleware, AdminToken, AuthUser, ADMIN_TOKEN_HEADER};
pub use request_id::{request_id_middleware, RequestId};
