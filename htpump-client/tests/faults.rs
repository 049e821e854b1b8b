//! Fault list tests

mod common;

use common::{logged_in_client, request_bytes};

use htpump_core::HtpError;

#[tokio::test]
async fn last_fault_is_parsed() {
    let mut client = logged_in_client(&["AA,29,20,14.09.14-11:52:08,EQ_Spreizung"]).await;
    let entry = client.get_last_fault().await.unwrap();
    assert_eq!(entry.index, 29);
    assert_eq!(entry.error_code, 20);
    assert_eq!(entry.message, "EQ_Spreizung");
    assert_eq!(entry.timestamp.to_string(), "2014-09-14 11:52:08");
}

#[tokio::test]
async fn fault_list_size_is_parsed() {
    let mut client = logged_in_client(&["SUM=2757"]).await;
    assert_eq!(client.get_fault_list_size().await.unwrap(), 2757);
}

#[tokio::test]
async fn complete_fault_list_in_one_piece() {
    let mut answers = vec!["SUM=5".to_string()];
    for i in 0..5 {
        answers.push(format!("AA,{i},{},01.02.16-0{i}:30:00,Anlagenfehler", 10 + i));
    }
    let answer_refs: Vec<&str> = answers.iter().map(String::as_str).collect();
    let mut client = logged_in_client(&answer_refs).await;
    let entries = client.get_fault_list().await.unwrap();
    assert_eq!(entries.len(), 5);
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.index, i as u32);
        assert_eq!(entry.error_code, 10 + i as u32);
        assert_eq!(entry.message, "Anlagenfehler");
    }
    let written = client.into_transport().take_written();
    assert_eq!(written, request_bytes(&["LIN", "ALS", "AR,0,1,2,3,4"]));
}

#[tokio::test]
async fn long_index_lists_are_split_into_several_requests() {
    // 60 five-character arguments exceed one command, so the request is
    // sent in two pieces of 50 and 10 indices
    let indices: Vec<u32> = (1000..1060).collect();
    let answers: Vec<String> = indices
        .iter()
        .map(|i| format!("AA,{i},77,14.09.14-11:52:08,EQ_Spreizung"))
        .collect();
    let answer_refs: Vec<&str> = answers.iter().map(String::as_str).collect();
    let mut client = logged_in_client(&answer_refs).await;
    let entries = client.get_fault_list_entries(&indices).await.unwrap();
    assert_eq!(entries.len(), indices.len());
    for (entry, index) in entries.iter().zip(&indices) {
        assert_eq!(entry.index, *index);
    }

    let first: String = std::iter::once("AR".to_string())
        .chain((1000..1050).map(|i| i.to_string()))
        .collect::<Vec<_>>()
        .join(",");
    let second: String = std::iter::once("AR".to_string())
        .chain((1050..1060).map(|i| i.to_string()))
        .collect::<Vec<_>>()
        .join(",");
    let written = client.into_transport().take_written();
    assert_eq!(written, request_bytes(&["LIN", &first, &second]));
}

#[tokio::test]
async fn mismatched_fault_index_is_a_protocol_error() {
    let mut client = logged_in_client(&["AA,8,20,14.09.14-11:52:08,EQ_Spreizung"]).await;
    assert!(matches!(
        client.get_fault_list_entries(&[7]).await,
        Err(HtpError::Protocol(_))
    ));
}
