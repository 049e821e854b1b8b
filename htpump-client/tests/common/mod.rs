//! Shared helpers for the client integration tests

use htpump_catalog::ParameterCatalog;
use htpump_client::HtClient;
use htpump_protocol::{encode_request, encode_response};
use htpump_transport::MockStream;

/// Build a stream scripted with the given device answers.
pub fn scripted(answers: &[&str]) -> MockStream {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut stream = MockStream::new();
    for answer in answers {
        stream.push_bytes(&encode_response(answer));
    }
    stream
}

/// Build a connected, logged-in client whose device will answer with
/// `answers` after the login acknowledgement.
pub async fn logged_in_client(answers: &[&str]) -> HtClient<MockStream> {
    let mut all = vec!["OK"];
    all.extend_from_slice(answers);
    let stream = scripted(&all);
    let mut client = HtClient::with_catalog(stream, ParameterCatalog::builtin().unwrap());
    client.open_connection().await.unwrap();
    client.login(false).await.unwrap();
    client
}

/// The raw bytes the driver is expected to write for these commands.
pub fn request_bytes(commands: &[&str]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for command in commands {
        bytes.extend_from_slice(&encode_request(command).unwrap());
    }
    bytes
}
