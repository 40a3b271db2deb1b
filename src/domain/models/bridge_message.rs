#[cfg(test)]
#[path = "bridge_message_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;
use serde_json::Value;

pub const MESSAGE_PREFIX: &str = "cses-companion-";

/// Which flavour of "give me the code" a request is. Each kind has its own
/// request and response message type on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum CodeRequest {
    Submission,
    Save,
    Run,
    Submit,
}

/// The only unit exchanged between the toolbar and the page-world editor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BridgeMessage {
    #[serde(rename = "cses-companion-set-lang")]
    SetLanguage { language: String },
    #[serde(rename = "cses-companion-set-font")]
    SetFont {
        #[serde(rename = "fontSize")]
        font_size: u32,
    },
    #[serde(rename = "cses-companion-insert-code")]
    InsertCode { code: String },
    #[serde(rename = "cses-companion-get-code")]
    GetCode,
    #[serde(rename = "cses-companion-get-code-for-save")]
    GetCodeForSave,
    #[serde(rename = "cses-companion-get-code-for-run")]
    GetCodeForRun,
    #[serde(rename = "cses-companion-get-code-for-submit")]
    GetCodeForSubmit,
    #[serde(rename = "cses-companion-response-code")]
    ResponseCode { code: String },
    #[serde(rename = "cses-companion-response-code-for-save")]
    ResponseCodeForSave { code: String },
    #[serde(rename = "cses-companion-response-code-for-run")]
    ResponseCodeForRun { code: String },
    #[serde(rename = "cses-companion-response-code-for-submit")]
    ResponseCodeForSubmit { code: String },
    #[serde(rename = "cses-companion-update-theme")]
    UpdateTheme {
        #[serde(rename = "isDarkTheme")]
        is_dark_theme: bool,
    },
    #[serde(rename = "cses-companion-ready")]
    Ready,
}

impl BridgeMessage {
    /// Reads a raw window message. Anything that isn't ours, isn't a known
    /// type, or carries a malformed payload yields `None`.
    pub fn parse(data: &Value) -> Option<BridgeMessage> {
        let message_type = data.get("type")?.as_str()?;
        if !message_type.starts_with(MESSAGE_PREFIX) {
            return None;
        }

        return serde_json::from_value::<BridgeMessage>(data.clone()).ok();
    }

    pub fn to_value(&self) -> Value {
        // Every variant is a plain struct of strings, numbers and bools.
        return serde_json::to_value(self).unwrap_or(Value::Null);
    }

    pub fn request(kind: CodeRequest) -> BridgeMessage {
        match kind {
            CodeRequest::Submission => return BridgeMessage::GetCode,
            CodeRequest::Save => return BridgeMessage::GetCodeForSave,
            CodeRequest::Run => return BridgeMessage::GetCodeForRun,
            CodeRequest::Submit => return BridgeMessage::GetCodeForSubmit,
        }
    }

    pub fn response(kind: CodeRequest, code: String) -> BridgeMessage {
        match kind {
            CodeRequest::Submission => return BridgeMessage::ResponseCode { code },
            CodeRequest::Save => return BridgeMessage::ResponseCodeForSave { code },
            CodeRequest::Run => return BridgeMessage::ResponseCodeForRun { code },
            CodeRequest::Submit => return BridgeMessage::ResponseCodeForSubmit { code },
        }
    }

    /// The request kind when this message asks the editor for its code.
    pub fn as_request(&self) -> Option<CodeRequest> {
        match self {
            BridgeMessage::GetCode => return Some(CodeRequest::Submission),
            BridgeMessage::GetCodeForSave => return Some(CodeRequest::Save),
            BridgeMessage::GetCodeForRun => return Some(CodeRequest::Run),
            BridgeMessage::GetCodeForSubmit => return Some(CodeRequest::Submit),
            _ => return None,
        }
    }

    /// The request kind and code when this message answers a code request.
    pub fn as_response(&self) -> Option<(CodeRequest, &str)> {
        match self {
            BridgeMessage::ResponseCode { code } => return Some((CodeRequest::Submission, code)),
            BridgeMessage::ResponseCodeForSave { code } => return Some((CodeRequest::Save, code)),
            BridgeMessage::ResponseCodeForRun { code } => return Some((CodeRequest::Run, code)),
            BridgeMessage::ResponseCodeForSubmit { code } => {
                return Some((CodeRequest::Submit, code))
            }
            _ => return None,
        }
    }
}
