use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde::de::DeserializeOwned;

const API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

/// What the processor needs from the mail service. The query scope is fixed
/// to unread messages; everything else about transport stays behind this
/// trait.
pub trait MailApi {
    fn list_unread(&self) -> Result<Vec<MessageRef>>;
    fn get_message(&self, id: &str) -> Result<Message>;
    fn modify_labels(&self, id: &str, add: &[&str], remove: &[&str]) -> Result<()>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageRef {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub payload: Option<Payload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    #[serde(default)]
    pub headers: Vec<Header>,
    pub body: Option<Body>,
    #[serde(default)]
    pub parts: Vec<Payload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Body {
    pub data: Option<String>,
}

/// Gmail REST client over the blocking reqwest client.
pub struct GmailClient {
    http: reqwest::blocking::Client,
    access_token: String,
}

impl GmailClient {
    pub fn new(access_token: String) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .build()
            .context("building http client")?;
        Ok(Self { http, access_token })
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(&self.access_token)
            .send()
            .with_context(|| format!("GET {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(anyhow!("gmail api returned {status} for {url}: {body}"));
        }
        Ok(resp.json()?)
    }
}

impl MailApi for GmailClient {
    fn list_unread(&self) -> Result<Vec<MessageRef>> {
        #[derive(Deserialize)]
        struct Listing {
            #[serde(default)]
            messages: Vec<MessageRef>,
        }

        let listing: Listing =
            self.get_json(&format!("{API_BASE}/messages"), &[("q", "is:unread")])?;
        Ok(listing.messages)
    }

    fn get_message(&self, id: &str) -> Result<Message> {
        self.get_json(
            &format!("{API_BASE}/messages/{id}"),
            &[("format", "full")],
        )
    }

    fn modify_labels(&self, id: &str, add: &[&str], remove: &[&str]) -> Result<()> {
        let url = format!("{API_BASE}/messages/{id}/modify");
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({
                "addLabelIds": add,
                "removeLabelIds": remove,
            }))
            .send()
            .with_context(|| format!("POST {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(anyhow!("gmail api returned {status} for {url}: {body}"));
        }
        Ok(())
    }
}
