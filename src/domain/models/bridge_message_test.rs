use serde_json::json;
use test_utils::insta_snapshot;

use super::BridgeMessage;
use super::CodeRequest;

#[test]
fn it_serializes_with_prefixed_types() {
    let message = BridgeMessage::SetFont { font_size: 16 };
    insta::assert_snapshot!(message.to_value().to_string(), @r###"{"fontSize":16,"type":"cses-companion-set-font"}"###);

    let message = BridgeMessage::UpdateTheme {
        is_dark_theme: true,
    };
    insta::assert_snapshot!(message.to_value().to_string(), @r###"{"isDarkTheme":true,"type":"cses-companion-update-theme"}"###);
}

#[test]
fn it_carries_code_in_the_payload() {
    let message = BridgeMessage::InsertCode {
        code: "int main() {\n    return 0;\n}".to_string(),
    };

    insta_snapshot(|| {
        insta::assert_json_snapshot!("insert_code_message", message);
    });
}

#[test]
fn it_parses_known_messages() {
    let parsed = BridgeMessage::parse(&json!({
        "type": "cses-companion-set-lang",
        "language": "python"
    }));

    assert_eq!(
        parsed,
        Some(BridgeMessage::SetLanguage {
            language: "python".to_string()
        })
    );

    let parsed = BridgeMessage::parse(&json!({ "type": "cses-companion-get-code-for-save" }));
    assert_eq!(parsed, Some(BridgeMessage::GetCodeForSave));
}

#[test]
fn it_ignores_foreign_and_unknown_messages() {
    assert!(BridgeMessage::parse(&json!({ "type": "webpackOk" })).is_none());
    assert!(BridgeMessage::parse(&json!({ "type": "cses-companion-reboot" })).is_none());
    assert!(BridgeMessage::parse(&json!({ "hello": "world" })).is_none());
    assert!(BridgeMessage::parse(&json!("cses-companion-get-code")).is_none());
    assert!(BridgeMessage::parse(&json!({ "type": 12 })).is_none());
}

#[test]
fn it_ignores_malformed_payloads() {
    let parsed = BridgeMessage::parse(&json!({
        "type": "cses-companion-set-font",
        "fontSize": "sixteen"
    }));

    assert!(parsed.is_none());
}

#[test]
fn it_pairs_requests_with_responses() {
    for kind in [
        CodeRequest::Submission,
        CodeRequest::Save,
        CodeRequest::Run,
        CodeRequest::Submit,
    ] {
        assert_eq!(BridgeMessage::request(kind).as_request(), Some(kind));

        let response = BridgeMessage::response(kind, "x".to_string());
        assert_eq!(response.as_response(), Some((kind, "x")));
        assert!(response.as_request().is_none());
    }
}
