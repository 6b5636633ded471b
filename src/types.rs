use serde::Deserialize;

/// Post record served by the demo data source.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
}

/// User record served by the demo data source.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<Company>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Company {
    #[serde(default)]
    pub name: Option<String>,
}
