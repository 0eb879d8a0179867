// handlers/public/auth/mod.rs - Public authentication handlers
//
// Token acquisition endpoints. Both return `{ user, token }`; the token is
// then presented as `Authorization: Bearer <token>` on every /api/* route.

pub mod login; // POST /api/auth/login - exchange credentials for a JWT
pub mod signup; // POST /api/auth/signup - create an account and get a JWT

pub use login::login_post;
pub use signup::signup_post;
