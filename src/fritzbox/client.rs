// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! High-level FRITZ!Box client

use std::sync::Arc;
use std::time::Duration;

use super::device::{Device, decode_device_list};
use super::network::{TrafficSnapshot, decode_traffic_snapshot};
use super::session::SessionManager;
use super::transport::{HttpTransport, Transport};
use crate::config::FritzBoxConfig;
use crate::error::{AppError, Result};

/// Smart home web service
const HOME_AUTO_PATH: &str = "/webservices/homeautoswitch.lua";

/// Traffic monitor page
const TRAFFIC_MONITOR_PATH: &str = "/internet/inetstat_monitor.lua";

/// Upper bound for the logout on shutdown
pub const LOGOUT_TIMEOUT: Duration = Duration::from_secs(2);

/// FRITZ!Box API client
///
/// Every data call obtains a session id first; the session manager logs in
/// transparently when the router no longer accepts the cached one.
pub struct FritzBoxClient {
    transport: Arc<dyn Transport>,
    session: SessionManager,
}

impl FritzBoxClient {
    /// Creates a client talking HTTP to the configured router
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(config: &FritzBoxConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config.base_url)?);
        Ok(Self::with_transport(
            transport,
            &config.username,
            &config.password,
        ))
    }

    /// Creates a client on top of an existing transport
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>, username: &str, password: &str) -> Self {
        let session = SessionManager::new(transport.clone(), username, password);
        Self { transport, session }
    }

    /// Lists all smart home devices
    ///
    /// # Errors
    ///
    /// Returns auth, transport or decode errors.
    pub async fn devices(&self) -> Result<Vec<Device>> {
        tracing::debug!("Requesting list of devices");
        let body = self.command("getdevicelistinfos", &[]).await?;
        decode_device_list(&body)
    }

    /// Reads the current traffic monitor snapshot
    ///
    /// # Errors
    ///
    /// Returns auth, transport or decode errors.
    pub async fn network_stats(&self) -> Result<TrafficSnapshot> {
        tracing::debug!("Requesting traffic monitor data");
        let sid = self.session.session_id().await?;
        let body = self
            .transport
            .get(
                TRAFFIC_MONITOR_PATH,
                &[
                    ("sid", sid.as_str()),
                    ("myXhr", "1"),
                    ("xhr", "1"),
                    ("useajax", "1"),
                    ("action", "get_graphic"),
                ],
            )
            .await?;
        decode_traffic_snapshot(&body)
    }

    /// Runs a `switchcmd` against the smart home web service
    async fn command(&self, cmd: &str, args: &[(&str, &str)]) -> Result<Vec<u8>> {
        let sid = self.session.session_id().await?;
        let mut params = args.to_vec();
        params.push(("sid", sid.as_str()));
        params.push(("switchcmd", cmd));
        self.transport.get(HOME_AUTO_PATH, &params).await
    }

    /// Logs out, giving up after `LOGOUT_TIMEOUT`
    ///
    /// # Errors
    ///
    /// Returns the logout error or `AppError::Io` with `TimedOut` if the
    /// router did not answer in time.
    pub async fn close(&self) -> Result<()> {
        match tokio::time::timeout(LOGOUT_TIMEOUT, self.session.logout()).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!(
                    "logout did not finish within {}s",
                    LOGOUT_TIMEOUT.as_secs()
                ),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fritzbox::session::{LOGIN_PATH, ZERO_SESSION_ID};
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    const SID: &str = "1234abcd5678ef90";

    /// Fake router: accepts any login and serves fixed payloads
    #[derive(Default)]
    struct FakeRouter {
        calls: StdMutex<Vec<(String, Vec<(String, String)>)>>,
        device_list: String,
        traffic: String,
        hang_on_logout: bool,
    }

    impl FakeRouter {
        fn calls(&self) -> Vec<(String, Vec<(String, String)>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for FakeRouter {
        async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<u8>> {
            self.calls.lock().unwrap().push((
                path.to_string(),
                params
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
            ));
            let param = |key: &str| params.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);
            match path {
                LOGIN_PATH if param("logout").is_some() => {
                    if self.hang_on_logout {
                        std::future::pending::<()>().await;
                    }
                    Ok(Vec::new())
                }
                LOGIN_PATH => {
                    let sid = if param("response").is_some() || param("sid") == Some(SID) {
                        SID
                    } else {
                        ZERO_SESSION_ID
                    };
                    Ok(format!(
                        "<SessionInfo><SID>{sid}</SID><Challenge>abc123</Challenge><BlockTime>0</BlockTime></SessionInfo>"
                    )
                    .into_bytes())
                }
                HOME_AUTO_PATH => Ok(self.device_list.clone().into_bytes()),
                TRAFFIC_MONITOR_PATH => Ok(self.traffic.clone().into_bytes()),
                _ => Err(AppError::Status {
                    status: 404,
                    path: path.to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_devices_sends_sid_and_switchcmd() {
        let router = Arc::new(FakeRouter {
            device_list: r#"<devicelist><device identifier="1" functionbitmask="256"><present>1</present><name>Sensor</name><temperature><celsius>200</celsius></temperature></device></devicelist>"#.to_string(),
            ..FakeRouter::default()
        });
        let client = FritzBoxClient::with_transport(router.clone(), "monitor", "secret");

        let devices = client.devices().await.unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].name, "Sensor");

        let calls = router.calls();
        let (path, params) = calls.last().unwrap();
        assert_eq!(path, HOME_AUTO_PATH);
        assert!(params.contains(&("sid".to_string(), SID.to_string())));
        assert!(params.contains(&("switchcmd".to_string(), "getdevicelistinfos".to_string())));
    }

    #[tokio::test]
    async fn test_network_stats_sends_ajax_markers() {
        let series = serde_json::to_string(&vec![10.0; 20]).unwrap();
        let traffic = format!(
            "[{{\"ds_bps_curr\":{s},\"ds_mc_bps_curr\":{s},\"ds_guest_bps_curr\":{s},\
             \"us_realtime_bps_curr\":{s},\"us_important_bps_curr\":{s},\
             \"us_default_bps_curr\":{s},\"us_background_bps_curr\":{s},\"guest_us_bps\":{s}}}]",
            s = series
        );
        let router = Arc::new(FakeRouter {
            traffic,
            ..FakeRouter::default()
        });
        let client = FritzBoxClient::with_transport(router.clone(), "monitor", "secret");

        let snapshot = client.network_stats().await.unwrap();
        assert_eq!(
            snapshot.latest(crate::fritzbox::TrafficStream::DownstreamInternet),
            10.0
        );

        let calls = router.calls();
        let (path, params) = calls.last().unwrap();
        assert_eq!(path, TRAFFIC_MONITOR_PATH);
        for (key, value) in [
            ("sid", SID),
            ("myXhr", "1"),
            ("xhr", "1"),
            ("useajax", "1"),
            ("action", "get_graphic"),
        ] {
            assert!(
                params.contains(&(key.to_string(), value.to_string())),
                "missing {key}={value}"
            );
        }
    }

    #[tokio::test]
    async fn test_no_data_call_without_session() {
        let router = Arc::new(FakeRouter::default());
        let client = FritzBoxClient::with_transport(router.clone(), "monitor", "secret");

        // The device list is empty, so decoding fails, but only after login
        let _ = client.devices().await;
        let calls = router.calls();
        assert_eq!(calls[0].0, LOGIN_PATH);
        assert_eq!(calls[1].0, LOGIN_PATH);
        assert_eq!(calls[2].0, HOME_AUTO_PATH);
    }

    #[tokio::test]
    async fn test_close_without_session_does_not_call_router() {
        let router = Arc::new(FakeRouter::default());
        let client = FritzBoxClient::with_transport(router.clone(), "monitor", "secret");
        client.close().await.unwrap();
        assert!(router.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_is_bounded_when_router_hangs() {
        let router = Arc::new(FakeRouter {
            device_list: "<devicelist></devicelist>".to_string(),
            hang_on_logout: true,
            ..FakeRouter::default()
        });
        let client = FritzBoxClient::with_transport(router.clone(), "monitor", "secret");
        client.devices().await.unwrap();

        let start = tokio::time::Instant::now();
        let err = client.close().await.unwrap_err();
        assert!(matches!(err, AppError::Io(ref e) if e.kind() == std::io::ErrorKind::TimedOut));
        assert_eq!(start.elapsed(), LOGOUT_TIMEOUT);
    }
}
