//! Parameter access tests

mod common;

use common::{logged_in_client, request_bytes};

use htpump_core::{HtpError, Value};
use htpump_client::{VerifyAction, VerifySettings};

#[tokio::test]
async fn get_param_returns_the_typed_value() {
    let mut client = logged_in_client(&[
        "SP,NR=69,ID=69,NAME=HKR Soll_Raum,LEN=4,TP=0,BIT=0,VAL=21.5,MAX=25.0,MIN=10.0,WR=1,US=1",
    ])
    .await;
    let value = client.get_param("HKR Soll_Raum").await.unwrap();
    assert_eq!(value, Value::Float(21.5));
    let written = client.into_transport().take_written();
    assert_eq!(written, request_bytes(&["LIN", "SP,NR=69"]));
}

#[tokio::test]
async fn get_param_rejects_unknown_names() {
    let mut client = logged_in_client(&[]).await;
    assert!(matches!(
        client.get_param("No Such Param").await,
        Err(HtpError::UnknownParameter(name)) if name == "No Such Param"
    ));
}

#[tokio::test]
async fn set_param_accepts_a_matching_echo() {
    let mut client = logged_in_client(&[
        "SP,NR=69,ID=69,NAME=HKR Soll_Raum,LEN=4,TP=0,BIT=0,VAL=21.5,MAX=25.0,MIN=10.0,WR=1,US=1",
    ])
    .await;
    let value = client
        .set_param("HKR Soll_Raum", Value::Float(21.5))
        .await
        .unwrap();
    assert_eq!(value, Value::Float(21.5));
    let written = client.into_transport().take_written();
    assert_eq!(written, request_bytes(&["LIN", "SP,NR=69,VAL=21.5"]));
}

#[tokio::test]
async fn set_param_detects_a_diverging_echo() {
    // the device clamps 21.5 down to 21.0
    let mut client = logged_in_client(&[
        "SP,NR=69,ID=69,NAME=HKR Soll_Raum,LEN=4,TP=0,BIT=0,VAL=21.0,MAX=25.0,MIN=10.0,WR=1,US=1",
    ])
    .await;
    match client.set_param("HKR Soll_Raum", Value::Float(21.5)).await {
        Err(HtpError::SetParamRejected {
            param,
            requested,
            observed,
        }) => {
            assert_eq!(param, "HKR Soll_Raum");
            assert_eq!(requested, Value::Float(21.5));
            assert_eq!(observed, Value::Float(21.0));
        }
        other => panic!("expected a rejected set request, got {other:?}"),
    }
}

#[tokio::test]
async fn set_param_checks_the_limits_before_writing() {
    let mut client = logged_in_client(&[]).await;
    match client.set_param("HKR Soll_Raum", Value::Float(30.0)).await {
        Err(HtpError::OutOfRange { value, min, max, .. }) => {
            assert_eq!(value, Value::Float(30.0));
            assert_eq!(min, Value::Float(10.0));
            assert_eq!(max, Value::Float(25.0));
        }
        other => panic!("expected an out of range error, got {other:?}"),
    }
    // nothing besides the login request went out
    let written = client.into_transport().take_written();
    assert_eq!(written, request_bytes(&["LIN"]));
}

#[tokio::test]
async fn set_param_widens_an_integer_request() {
    let mut client = logged_in_client(&[
        "SP,NR=69,ID=69,NAME=HKR Soll_Raum,LEN=4,TP=0,BIT=0,VAL=21.0,MAX=25.0,MIN=10.0,WR=1,US=1",
    ])
    .await;
    let value = client
        .set_param("HKR Soll_Raum", Value::Int(21))
        .await
        .unwrap();
    assert_eq!(value, Value::Float(21.0));
    // the integer request is rendered in the float wire form
    let written = client.into_transport().take_written();
    assert_eq!(written, request_bytes(&["LIN", "SP,NR=69,VAL=21.0"]));
}

#[tokio::test]
async fn in_error_maps_the_fault_indicator() {
    let mut client = logged_in_client(&[
        "MP,NR=31,ID=31,NAME=Stoerung,LEN=1,TP=0,BIT=0,VAL=1,MAX=1,MIN=0,WR=0,US=1",
    ])
    .await;
    assert!(client.in_error().await.unwrap());
}

#[tokio::test]
async fn fast_query_reads_several_data_points_at_once() {
    let mut client = logged_in_client(&["MA,0,-3.4,17", "MA,3,28.5,16"]).await;
    let values = client
        .fast_query(&["Temp. Aussen", "Temp. Vorlauf"])
        .await
        .unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values["Temp. Aussen"], Value::Float(-3.4));
    assert_eq!(values["Temp. Vorlauf"], Value::Float(28.5));
    let written = client.into_transport().take_written();
    assert_eq!(written, request_bytes(&["LIN", "MR,0,3"]));
}

#[tokio::test]
async fn fast_query_rejects_setting_data_points_before_any_io() {
    let mut client = logged_in_client(&[]).await;
    match client.fast_query(&["Temp. Aussen", "Betriebsart"]).await {
        Err(HtpError::UnsupportedKind { param, .. }) => assert_eq!(param, "Betriebsart"),
        other => panic!("expected an unsupported kind error, got {other:?}"),
    }
    let written = client.into_transport().take_written();
    assert_eq!(written, request_bytes(&["LIN"]));
}

#[tokio::test]
async fn verification_can_be_strict() {
    let mut client = logged_in_client(&[
        "SP,NR=69,ID=69,NAME=Wrong Name,LEN=4,TP=0,BIT=0,VAL=21.5,MAX=25.0,MIN=10.0,WR=1,US=1",
    ])
    .await;
    client.set_verify_settings(VerifySettings {
        actions: VerifyAction::all(),
        treat_as_error: true,
    });
    assert!(matches!(
        client.get_param("HKR Soll_Raum").await,
        Err(HtpError::Verification(_))
    ));
}

#[tokio::test]
async fn update_param_limits_reports_changed_parameters() {
    let catalog = htpump_catalog::parse_catalog(
        "\"Betriebsart\", SP, 13, rw, INT, 0, 7\n\
         \"HKR Soll_Raum\", SP, 69, rw, FLOAT, 10.0, 25.0\n",
    )
    .unwrap();
    // answers arrive in catalog (name) order; only the second one shifts
    // its limits
    let stream = common::scripted(&[
        "OK",
        "SP,NR=13,ID=13,NAME=Betriebsart,LEN=4,TP=0,BIT=0,VAL=1,MAX=7,MIN=0,WR=1,US=1",
        "SP,NR=69,ID=69,NAME=HKR Soll_Raum,LEN=4,TP=0,BIT=0,VAL=21.5,MAX=30.0,MIN=5.0,WR=1,US=1",
    ]);
    let mut client = htpump_client::HtClient::with_catalog(stream, catalog);
    client.open_connection().await.unwrap();
    client.login(false).await.unwrap();

    let updated = client.update_param_limits().await.unwrap();
    assert_eq!(updated, vec!["HKR Soll_Raum".to_string()]);
    let desc = client.catalog().get("HKR Soll_Raum").unwrap();
    assert_eq!(desc.min(), Some(Value::Float(5.0)));
    assert_eq!(desc.max(), Some(Value::Float(30.0)));
    let desc = client.catalog().get("Betriebsart").unwrap();
    assert_eq!(desc.min(), Some(Value::Int(0)));
    assert_eq!(desc.max(), Some(Value::Int(7)));
}
