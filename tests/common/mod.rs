// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Fake FRITZ!Box web API served on a loopback port

#![allow(dead_code)]

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const USERNAME: &str = "monitor";
pub const PASSWORD: &str = "äbc";
pub const CHALLENGE: &str = "1234567z";
/// Response AVM documents for `CHALLENGE` and `PASSWORD`
pub const EXPECTED_RESPONSE: &str = "1234567z-9e224a41eeefa284df7bb0f26c2913e2";
pub const SID: &str = "fedcba9876543210";

pub const DEVICE_LIST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<devicelist version="1" fwversion="7.57">
    <device identifier="11657 0272633" id="16" functionbitmask="35712" fwversion="04.25" manufacturer="AVM" productname="FRITZ!DECT 200">
        <present>1</present>
        <txbusy>0</txbusy>
        <name>Washing Machine</name>
        <switch><state>1</state><mode>manuell</mode><lock>0</lock><devicelock>0</devicelock></switch>
        <simpleonoff><state>1</state></simpleonoff>
        <powermeter><voltage>229515</voltage><power>2180</power><energy>12345</energy></powermeter>
        <temperature><celsius>235</celsius><offset>0</offset></temperature>
    </device>
    <device identifier="13979 0497391" id="17" functionbitmask="320" fwversion="05.08" manufacturer="AVM" productname="FRITZ!DECT 301">
        <present>1</present>
        <name>Living Room</name>
        <temperature><celsius>205</celsius><offset>-5</offset></temperature>
        <hkr><tist>41</tist><tsoll>42</tsoll></hkr>
    </device>
</devicelist>"#;

/// Traffic monitor payload whose newest bucket is `latest` for every stream
pub fn traffic_json(latest: f64) -> String {
    let mut series = vec![0.0; 20];
    series[0] = latest;
    let s = serde_json::to_string(&series).unwrap();
    format!(
        "[{{\"ds_bps_curr\":{s},\"ds_mc_bps_curr\":{s},\"ds_guest_bps_curr\":{s},\
         \"us_realtime_bps_curr\":{s},\"us_important_bps_curr\":{s},\
         \"us_default_bps_curr\":{s},\"us_background_bps_curr\":{s},\"guest_us_bps\":{s},\
         \"ds_bps_max\":51000000,\"us_bps_max\":10000000}}]"
    )
}

#[derive(Default)]
pub struct FakeFritzBox {
    pub logins: AtomicUsize,
    pub logouts: AtomicUsize,
    pub device_requests: AtomicUsize,
    pub traffic_requests: AtomicUsize,
}

impl FakeFritzBox {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

type Params = Query<HashMap<String, String>>;

pub fn session_xml(sid: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?><SessionInfo><SID>{sid}</SID>\
         <Challenge>{CHALLENGE}</Challenge><BlockTime>0</BlockTime>\
         <Rights><Name>Dial</Name><Access>2</Access><Name>HomeAuto</Name><Access>2</Access></Rights>\
         </SessionInfo>"
    )
}

fn session_info(sid: &str) -> Response {
    (
        StatusCode::OK,
        [("Content-Type", "text/xml")],
        session_xml(sid),
    )
        .into_response()
}

async fn login(State(state): State<Arc<FakeFritzBox>>, Query(params): Params) -> Response {
    let param = |key: &str| params.get(key).map(String::as_str);

    if param("logout").is_some() {
        state.logouts.fetch_add(1, Ordering::SeqCst);
        return session_info("0000000000000000");
    }
    if let Some(response) = param("response") {
        if response == EXPECTED_RESPONSE && param("username") == Some(USERNAME) {
            state.logins.fetch_add(1, Ordering::SeqCst);
            return session_info(SID);
        }
        return session_info("0000000000000000");
    }
    if param("sid") == Some(SID) {
        return session_info(SID);
    }
    session_info("0000000000000000")
}

async fn home_auto(State(state): State<Arc<FakeFritzBox>>, Query(params): Params) -> Response {
    if params.get("sid").map(String::as_str) != Some(SID) {
        return StatusCode::FORBIDDEN.into_response();
    }
    match params.get("switchcmd").map(String::as_str) {
        Some("getdevicelistinfos") => {
            state.device_requests.fetch_add(1, Ordering::SeqCst);
            (StatusCode::OK, [("Content-Type", "text/xml")], DEVICE_LIST).into_response()
        }
        _ => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn traffic(State(state): State<Arc<FakeFritzBox>>, Query(params): Params) -> Response {
    let param = |key: &str| params.get(key).map(String::as_str);
    if param("sid") != Some(SID) || param("action") != Some("get_graphic") {
        return StatusCode::FORBIDDEN.into_response();
    }
    state.traffic_requests.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::OK,
        [("Content-Type", "application/json")],
        traffic_json(125_000.0),
    )
        .into_response()
}

/// Starts the fake router and returns its state and base URL
pub async fn spawn_fake_fritzbox() -> (Arc<FakeFritzBox>, String) {
    let state = Arc::new(FakeFritzBox::default());
    let app = Router::new()
        .route("/login_sid.lua", get(login))
        .route("/webservices/homeautoswitch.lua", get(home_auto))
        .route("/internet/inetstat_monitor.lua", get(traffic))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (state, format!("http://{addr}"))
}
