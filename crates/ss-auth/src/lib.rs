//! Epic Games account authentication for game launchers
//!
//! This crate turns the single token a launcher keeps in its settings file into the
//! short-lived credentials the game process logs in with.
//!
//! # Authentication Flow
//!
//! 1. Classify the stored token (nothing, an authorization code, or a refresh token)
//! 2. If there is nothing, ask the user to log in and paste an authorization code
//! 3. Exchange the authorization code for a refresh token
//! 4. Exchange the refresh token for an `eg1` access token (and a rotated refresh token)
//! 5. Exchange the access token for a single-use launch exchange code
//!
//! If step 4 is rejected the pipeline re-authorizes the user once and retries.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ss_auth::{
//!     AuthConfig, CredentialPipeline, EpicAccountClient, InteractiveAuthorizer,
//!     BrowserLauncher, Dialogs,
//! };
//!
//! # async fn example(dialogs: Arc<dyn Dialogs>, browser: Arc<dyn BrowserLauncher>)
//! #     -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuthConfig::epic_launcher();
//! let authorizer = InteractiveAuthorizer::new(config.login_url.clone(), dialogs, browser);
//! let client = EpicAccountClient::new(config)?;
//! let pipeline = CredentialPipeline::new(Arc::new(client), Arc::new(authorizer));
//!
//! let acquired = pipeline.get_launch_credentials("").await?;
//! println!("Logged in as {}", acquired.credentials.account_id);
//! // Save acquired.token_to_persist for the next run.
//! # Ok(())
//! # }
//! ```
//!
//! # Token Classification
//!
//! ```
//! use ss_auth::ClassifiedToken;
//!
//! assert_eq!(ClassifiedToken::classify(""), ClassifiedToken::Empty);
//! assert!(matches!(
//!     ClassifiedToken::classify("ABCDEFGHIJKLMNOPQRSTUVWXYZ012345"),
//!     ClassifiedToken::AuthorizationCode(_)
//! ));
//! ```
//!
//! # Important Notes
//!
//! - Tokens are never logged
//! - The pipeline never writes storage; callers persist `token_to_persist` themselves
//! - Every request carries a fresh `X-Epic-Correlation-ID`

pub mod authorizer;
pub mod classifier;
pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod ui;

// Re-export main types
pub use authorizer::{Authorizer, InteractiveAuthorizer};
pub use classifier::ClassifiedToken;
pub use client::{EpicAccountClient, TokenExchanger};
pub use config::{AuthConfig, HttpTimeouts};
pub use errors::{AuthError, ErrorKind, Result, TransportError};
pub use models::{ApiResponse, LaunchCredentials};
pub use pipeline::{Acquired, CredentialPipeline, PipelineError};
pub use ui::{BrowserLauncher, Dialogs};
