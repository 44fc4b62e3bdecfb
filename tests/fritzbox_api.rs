// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

mod common;

use common::{FakeFritzBox, PASSWORD, USERNAME, spawn_fake_fritzbox};
use fritzbox_exporter::{
    AppError, Capability, FritzBoxClient, FritzBoxConfig, HttpTransport, TrafficStream, Transport,
};

fn client_for(base_url: &str, password: &str) -> FritzBoxClient {
    let config = FritzBoxConfig {
        base_url: base_url.to_string(),
        username: USERNAME.to_string(),
        password: password.to_string(),
    };
    FritzBoxClient::new(&config).unwrap()
}

// --- login ---

#[tokio::test]
async fn login_solves_challenge_with_utf16_encoding() {
    let (router, base_url) = spawn_fake_fritzbox().await;
    let client = client_for(&base_url, PASSWORD);

    client.devices().await.unwrap();
    assert_eq!(FakeFritzBox::count(&router.logins), 1);
}

#[tokio::test]
async fn session_is_reused_across_calls() {
    let (router, base_url) = spawn_fake_fritzbox().await;
    let client = client_for(&base_url, PASSWORD);

    client.devices().await.unwrap();
    client.network_stats().await.unwrap();
    client.devices().await.unwrap();

    assert_eq!(FakeFritzBox::count(&router.logins), 1);
    assert_eq!(FakeFritzBox::count(&router.device_requests), 2);
    assert_eq!(FakeFritzBox::count(&router.traffic_requests), 1);
}

#[tokio::test]
async fn wrong_password_is_an_auth_error() {
    let (router, base_url) = spawn_fake_fritzbox().await;
    let client = client_for(&base_url, "wrong");

    let err = client.devices().await.unwrap_err();
    assert!(matches!(err, AppError::Auth(_)), "unexpected error: {err}");
    assert!(err.to_string().contains("check username and password"));
    assert_eq!(FakeFritzBox::count(&router.device_requests), 0);
}

// --- data ---

#[tokio::test]
async fn devices_are_decoded() {
    let (_router, base_url) = spawn_fake_fritzbox().await;
    let client = client_for(&base_url, PASSWORD);

    let devices = client.devices().await.unwrap();
    assert_eq!(devices.len(), 2);

    let plug = &devices[0];
    assert_eq!(plug.name, "Washing Machine");
    assert_eq!(plug.identifier, "11657 0272633");
    assert!(plug.present);
    assert!(plug.has(&[
        Capability::EnergyMeter,
        Capability::TemperatureSensor,
        Capability::SwitchableSocket
    ]));
    assert_eq!(plug.power.as_ref().unwrap().watts(), 2.18);

    let thermostat = &devices[1];
    assert!(thermostat.has(&[Capability::RadiatorRegulator, Capability::TemperatureSensor]));
    assert!(!thermostat.is_switch());
    assert_eq!(thermostat.temperature.as_ref().unwrap().celsius(), 20.5);
}

#[tokio::test]
async fn traffic_snapshot_is_decoded() {
    let (_router, base_url) = spawn_fake_fritzbox().await;
    let client = client_for(&base_url, PASSWORD);

    let snapshot = client.network_stats().await.unwrap();
    for stream in TrafficStream::ALL {
        assert_eq!(snapshot.latest(stream), 125_000.0);
        assert_eq!(snapshot.series(stream).len(), 20);
    }
}

// --- transport ---

#[tokio::test]
async fn non_200_status_is_a_transport_error() {
    let (_router, base_url) = spawn_fake_fritzbox().await;
    let transport = HttpTransport::new(&base_url).unwrap();

    let err = transport
        .get("/webservices/homeautoswitch.lua", &[("sid", "0000000000000000")])
        .await
        .unwrap_err();
    assert!(err.is_transport());
    assert!(matches!(
        err,
        AppError::Status { status: 403, ref path } if path == "/webservices/homeautoswitch.lua"
    ));

    let err = transport.get("/missing.lua", &[]).await.unwrap_err();
    assert!(matches!(err, AppError::Status { status: 404, .. }));
}

#[tokio::test]
async fn unreachable_router_is_a_transport_error() {
    // Bind and drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{addr}"), PASSWORD);
    let err = client.devices().await.unwrap_err();
    assert!(err.is_transport(), "unexpected error: {err}");
}

// --- logout ---

#[tokio::test]
async fn close_logs_out_once() {
    let (router, base_url) = spawn_fake_fritzbox().await;
    let client = client_for(&base_url, PASSWORD);

    client.devices().await.unwrap();
    client.close().await.unwrap();
    client.close().await.unwrap();

    assert_eq!(FakeFritzBox::count(&router.logouts), 1);
}

#[tokio::test]
async fn close_without_login_is_a_no_op() {
    let (router, base_url) = spawn_fake_fritzbox().await;
    let client = client_for(&base_url, PASSWORD);

    client.close().await.unwrap();
    assert_eq!(FakeFritzBox::count(&router.logouts), 0);
}

#[tokio::test]
async fn login_again_after_logout() {
    let (router, base_url) = spawn_fake_fritzbox().await;
    let client = client_for(&base_url, PASSWORD);

    client.devices().await.unwrap();
    client.close().await.unwrap();
    client.devices().await.unwrap();

    assert_eq!(FakeFritzBox::count(&router.logins), 2);
}
