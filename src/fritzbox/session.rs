// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! FRITZ!Box session handling
//!
//! Implements the challenge/response login described in AVM's
//! "Session ID" technical note. All callers share one session and
//! the handshake is serialized behind a mutex.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use md5::compute as md5_compute;
use serde::Deserialize;
use tokio::sync::Mutex;

use super::transport::Transport;
use crate::error::{AppError, Result};

/// Login endpoint
pub const LOGIN_PATH: &str = "/login_sid.lua";

/// Session id issued by the FRITZ!Box to indicate "no session"
pub const ZERO_SESSION_ID: &str = "0000000000000000";

/// Session document as returned by `login_sid.lua`
#[derive(Debug, Deserialize)]
#[serde(rename = "SessionInfo")]
struct SessionInfo {
    #[serde(rename = "SID", default)]
    sid: String,
    #[serde(rename = "Challenge", default)]
    challenge: String,
    #[serde(rename = "BlockTime", default)]
    block_time: String,
    #[serde(rename = "Rights", default)]
    rights: Rights,
}

#[derive(Debug, Default, Deserialize)]
struct Rights {
    #[serde(rename = "Name", default)]
    names: Vec<String>,
}

/// State of the current login session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub challenge: String,
    pub sid: String,
    pub block_time: Duration,
    pub permissions: BTreeSet<String>,
}

impl Session {
    /// Decodes a `SessionInfo` XML document
    ///
    /// # Errors
    ///
    /// Returns `AppError::Decode` for malformed documents.
    pub fn from_xml(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| AppError::Decode(format!("session response is not UTF-8: {e}")))?;
        let info: SessionInfo = quick_xml::de::from_str(text)
            .map_err(|e| AppError::Decode(format!("failed to parse session response: {e}")))?;

        Ok(Self {
            challenge: info.challenge.trim().to_string(),
            sid: info.sid.trim().to_string(),
            block_time: Duration::from_secs(info.block_time.trim().parse().unwrap_or(0)),
            permissions: info.rights.names.into_iter().collect(),
        })
    }

    /// Whether the router accepted this session
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.sid.is_empty() && self.sid != ZERO_SESSION_ID
    }
}

/// Computes the login response for a challenge
///
/// The router expects `<challenge>-<md5 of UTF-16LE "<challenge>-<password>">`.
pub fn solve_challenge(challenge: &str, password: &str) -> String {
    let data: Vec<u8> = format!("{challenge}-{password}")
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect();
    let digest = md5_compute(&data);
    format!("{challenge}-{}", hex::encode(digest.0))
}

/// Owns the single FRITZ!Box session shared by all pollers
pub struct SessionManager {
    transport: Arc<dyn Transport>,
    username: String,
    password: String,
    session: Mutex<Session>,
}

impl SessionManager {
    pub fn new(transport: Arc<dyn Transport>, username: &str, password: &str) -> Self {
        Self {
            transport,
            username: username.to_string(),
            password: password.to_string(),
            session: Mutex::new(Session::default()),
        }
    }

    /// Returns a valid session id, logging in when necessary
    ///
    /// The cached id is presented to the router first. Only when the router
    /// answers with the zero id is the challenge solved and submitted.
    ///
    /// # Errors
    ///
    /// Returns transport/decode errors from the login endpoint and
    /// `AppError::Auth` if the router rejects the credentials.
    pub async fn session_id(&self) -> Result<String> {
        let mut session = self.session.lock().await;

        let current = session.sid.clone();
        *session = self.request(&[("sid", current.as_str())]).await?;
        if session.is_valid() {
            tracing::trace!("Reusing existing FRITZ!Box session");
            return Ok(session.sid.clone());
        }

        if !session.block_time.is_zero() {
            tracing::warn!(
                "FRITZ!Box reports a login block time of {}s",
                session.block_time.as_secs()
            );
        }

        tracing::debug!("Authenticating new session at FRITZ!Box API");
        let response = solve_challenge(&session.challenge, &self.password);
        *session = self
            .request(&[
                ("response", response.as_str()),
                ("username", self.username.as_str()),
            ])
            .await?;

        if !session.is_valid() {
            return Err(AppError::Auth(
                "failed to solve authentication challenge, check username and password"
                    .to_string(),
            ));
        }

        tracing::debug!(
            "FRITZ!Box session established with rights: {:?}",
            session.permissions
        );
        Ok(session.sid.clone())
    }

    /// Ends the current session
    ///
    /// Does nothing if there is no session. The cached session is cleared
    /// even if the router cannot be reached.
    ///
    /// # Errors
    ///
    /// Returns transport errors from the logout request.
    pub async fn logout(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        if !session.is_valid() {
            return Ok(());
        }

        tracing::debug!("Logging out from FRITZ!Box API");
        let sid = std::mem::take(&mut *session).sid;
        self.transport
            .get(LOGIN_PATH, &[("logout", "true"), ("sid", sid.as_str())])
            .await?;
        Ok(())
    }

    async fn request(&self, params: &[(&str, &str)]) -> Result<Session> {
        let body = self.transport.get(LOGIN_PATH, params).await?;
        Session::from_xml(&body)
    }
}
