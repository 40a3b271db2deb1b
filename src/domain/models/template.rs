use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub code: String,
}

impl Template {
    pub fn new(name: &str, code: &str) -> Template {
        return Template {
            id: "".to_string(),
            name: name.to_string(),
            code: code.to_string(),
        };
    }
}
