//! Customer-service staff models

use serde::{Deserialize, Serialize};

/// Staff account as returned by `getkflist`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffAccount {
    pub kf_account: String,
    pub kf_nick: Option<String>,
    pub kf_id: Option<String>,
    pub kf_headimgurl: Option<String>,
    /// WeChat id bound to the account, if any
    pub kf_wx: Option<String>,
}

/// Online staff entry as returned by `getonlinekflist`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnlineStaff {
    pub kf_account: String,
    /// 1 = web client online
    pub status: i64,
    pub kf_id: Option<String>,
    /// Sessions currently being served
    pub accepted_case: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StaffListResponse {
    #[serde(default)]
    pub kf_list: Vec<StaffAccount>,
}

#[derive(Debug, Deserialize)]
pub struct OnlineStaffResponse {
    #[serde(default)]
    pub kf_online_list: Vec<OnlineStaff>,
}

/// Typing indicator command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypingCommand {
    Typing,
    CancelTyping,
}
