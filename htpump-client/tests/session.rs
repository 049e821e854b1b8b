//! Session lifecycle tests

mod common;

use common::{logged_in_client, request_bytes, scripted};

use htpump_catalog::ParameterCatalog;
use htpump_client::{HtClient, SessionState};
use htpump_core::HtpError;
use htpump_protocol::encode_response;

fn client_over(stream: htpump_transport::MockStream) -> HtClient<htpump_transport::MockStream> {
    HtClient::with_catalog(stream, ParameterCatalog::builtin().unwrap())
}

#[tokio::test]
async fn login_reaches_the_logged_in_state() {
    let stream = scripted(&["OK"]);
    let mut client = client_over(stream);
    client.open_connection().await.unwrap();
    client.login(false).await.unwrap();
    assert_eq!(client.state(), SessionState::LoggedIn);
    let stream = client.into_transport();
    assert_eq!(stream.written(), request_bytes(&["LIN"]));
    assert_eq!(stream.unread(), 0);
}

#[tokio::test]
async fn login_survives_a_corrupted_answer() {
    let mut corrupt = encode_response("OK").to_vec();
    let last = corrupt.len() - 1;
    corrupt[last] ^= 0xFF;
    let mut stream = scripted(&[]);
    stream.push_bytes(&corrupt);
    stream.push_bytes(&encode_response("OK"));

    let mut client = client_over(stream);
    client.open_connection().await.unwrap();
    client.login(false).await.unwrap();
    assert_eq!(client.state(), SessionState::LoggedIn);
    // the corrupted frame was discarded and re-read, no reconnect happened
    assert_eq!(client.into_transport().open_count(), 2);
}

#[tokio::test]
async fn login_reconnects_between_attempts() {
    let mut corrupt = encode_response("OK").to_vec();
    let last = corrupt.len() - 1;
    corrupt[last] ^= 0xFF;
    let mut stream = scripted(&[]);
    stream.push_bytes(&corrupt);
    stream.push_bytes(&encode_response("OK"));

    let mut client = client_over(stream);
    // no read retries, so the corrupted answer fails the first attempt
    client.set_read_retries(0);
    client.open_connection().await.unwrap();
    client.login(false).await.unwrap();
    assert_eq!(client.state(), SessionState::LoggedIn);
    let stream = client.into_transport();
    assert_eq!(stream.written(), request_bytes(&["LIN", "LIN"]));
    assert_eq!(stream.open_count(), 3);
}

#[tokio::test]
async fn login_requires_an_open_connection() {
    let stream = scripted(&["OK"]);
    let mut client = client_over(stream);
    assert!(matches!(
        client.login(false).await,
        Err(HtpError::NotConnected)
    ));
    assert!(client.into_transport().written().is_empty());
}

#[tokio::test]
async fn operations_require_a_login() {
    let stream = scripted(&[]);
    let mut client = client_over(stream);
    client.open_connection().await.unwrap();
    assert!(matches!(
        client.get_param("Temp. Aussen").await,
        Err(HtpError::NotLoggedIn)
    ));
    assert!(client.into_transport().written().is_empty());
}

#[tokio::test]
async fn serial_number_works_without_a_login() {
    let stream = scripted(&["RID,123456"]);
    let mut client = client_over(stream);
    client.open_connection().await.unwrap();
    assert_eq!(client.get_serial_number().await.unwrap(), 123456);
    assert_eq!(client.state(), SessionState::Connected);
}

#[tokio::test]
async fn raw_command_returns_the_answer_payload() {
    let stream = scripted(&["SP,NR=9,ID=9,NAME=3.0.20,LEN=7,TP=4,BIT=0,VAL=2321"]);
    let mut client = client_over(stream);
    client.open_connection().await.unwrap();
    let answer = client.command("SP,NR=9").await.unwrap();
    assert!(answer.starts_with("SP,NR=9,"));
    assert_eq!(client.into_transport().written(), request_bytes(&["SP,NR=9"]));
}

#[tokio::test]
async fn failed_logout_still_ends_the_session() {
    // no answer scripted for the LOUT request
    let mut client = logged_in_client(&[]).await;
    client.logout().await;
    assert_eq!(client.state(), SessionState::Connected);
}

#[tokio::test]
async fn version_query_parses_name_and_revision() {
    let mut client = logged_in_client(&[
        "SP,NR=9,ID=9,NAME=3.0.20,LEN=4,TP=0,BIT=0,VAL=2321,MAX=0,MIN=0,WR=0,US=1",
    ])
    .await;
    let (version, revision) = client.get_version().await.unwrap();
    assert_eq!(version, "3.0.20");
    assert_eq!(revision, 2321);
}

#[tokio::test]
async fn clock_round_trip() {
    let mut client = logged_in_client(&[
        "CLK,DA=26.11.15,TI=21:28:57,WD=4",
        "CLK,DA=27.11.15,TI=08:00:00,WD=5",
    ])
    .await;
    let (dt, weekday) = client.get_date_time().await.unwrap();
    assert_eq!(dt.to_string(), "2015-11-26 21:28:57");
    assert_eq!(weekday, 4);

    let new = chrono::NaiveDate::from_ymd_opt(2015, 11, 27)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    let (dt, weekday) = client.set_date_time(new).await.unwrap();
    assert_eq!(dt, new);
    assert_eq!(weekday, 5);
    let written = client.into_transport().take_written();
    let expected = request_bytes(&["LIN", "CLK", "CLK,DA=27.11.15,TI=08:00:00,WD=5"]);
    assert_eq!(written, expected);
}
