//! Customer-service endpoints
//!
//! Message delivery, typing indicators and staff listings.

use anyhow::Result;
use serde_json::Value;

use super::client::OfficialAccountClient;
use super::transformer::Payload;
use crate::models::{
    OnlineStaff, OnlineStaffResponse, StaffAccount, StaffListResponse, TypingCommand,
};

const SEND_PATH: &str = "cgi-bin/message/custom/send";
const TYPING_PATH: &str = "cgi-bin/message/custom/typing";
const STAFF_LIST_PATH: &str = "cgi-bin/customservice/getkflist";
const ONLINE_STAFF_PATH: &str = "cgi-bin/customservice/getonlinekflist";

/// Anything that can deliver a customer-service payload.
pub trait CustomerServiceClient {
    /// Whatever the delivery returns; handed back to callers unchanged.
    type Response;

    async fn send(&self, payload: Payload) -> Result<Self::Response>;
}

impl CustomerServiceClient for OfficialAccountClient {
    type Response = Value;

    async fn send(&self, payload: Payload) -> Result<Value> {
        self.post(SEND_PATH, &Value::Object(payload)).await
    }
}

impl OfficialAccountClient {
    /// Show or cancel the "typing" indicator in the user's chat window.
    pub async fn typing(&self, open_id: &str, on: bool) -> Result<Value> {
        self.post(TYPING_PATH, &typing_body(open_id, on)).await
    }

    /// All staff accounts of the official account.
    pub async fn staff_list(&self) -> Result<Vec<StaffAccount>> {
        let resp: StaffListResponse = self.get(STAFF_LIST_PATH).await?;
        Ok(resp.kf_list)
    }

    /// Staff currently online.
    pub async fn online_staff(&self) -> Result<Vec<OnlineStaff>> {
        let resp: OnlineStaffResponse = self.get(ONLINE_STAFF_PATH).await?;
        Ok(resp.kf_online_list)
    }
}

fn typing_body(open_id: &str, on: bool) -> Value {
    let command = if on {
        TypingCommand::Typing
    } else {
        TypingCommand::CancelTyping
    };
    serde_json::json!({
        "touser": open_id,
        "command": command,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typing_body() {
        assert_eq!(
            typing_body("u1", true),
            json!({"touser": "u1", "command": "Typing"})
        );
        assert_eq!(typing_body("u1", false)["command"], "CancelTyping");
    }

    #[test]
    fn test_staff_list_response() {
        let resp: StaffListResponse = serde_json::from_value(json!({
            "kf_list": [{
                "kf_account": "kf2001@gh_123",
                "kf_nick": "Alice",
                "kf_id": "2001",
                "kf_headimgurl": "http://mmbiz.qpic.cn/x"
            }]
        }))
        .unwrap();
        assert_eq!(resp.kf_list.len(), 1);
        assert_eq!(resp.kf_list[0].kf_nick.as_deref(), Some("Alice"));
        assert!(resp.kf_list[0].kf_wx.is_none());
    }

    #[test]
    fn test_online_staff_response() {
        let resp: OnlineStaffResponse = serde_json::from_value(json!({
            "kf_online_list": [
                {"kf_account": "kf2001@gh_123", "status": 1, "kf_id": "2001", "accepted_case": 3}
            ]
        }))
        .unwrap();
        assert_eq!(resp.kf_online_list[0].accepted_case, Some(3));

        let empty: OnlineStaffResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.kf_online_list.is_empty());
    }
}
