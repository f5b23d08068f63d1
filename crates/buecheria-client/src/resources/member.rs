//! Members.

use std::fmt;

use buecheria_session::Role;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Resource, Validate, require};
use crate::ValidationError;

/// A member's id (`MemberID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub i64);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A library member as returned by the API.
///
/// `membership_status` uses the same [`Role`] as sessions: a member is
/// either a plain `Member` or an `Admin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Member {
    #[serde(rename = "MemberID")]
    pub id: MemberId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub birth_date: NaiveDate,
    pub join_date: NaiveDate,
    pub membership_status: Role,
}

impl Member {
    /// `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload for creating a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MemberDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub birth_date: NaiveDate,
    pub join_date: NaiveDate,
    pub membership_status: Role,
}

impl Validate for MemberDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("FirstName", &self.first_name)?;
        require("LastName", &self.last_name)?;
        require("Email", &self.email)?;
        if !looks_like_email(&self.email) {
            return Err(ValidationError::new("Email", "must look like name@domain"));
        }
        require("Phone", &self.phone)?;
        require("Address", &self.address)?;
        if self.join_date < self.birth_date {
            return Err(ValidationError::new("JoinDate", "is before BirthDate"));
        }
        Ok(())
    }
}

/// A cheap shape check: one `@`, something before it, and a dotted domain
/// after it. Real deliverability is the server's problem.
fn looks_like_email(s: &str) -> bool {
    let s = s.trim();
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !s.contains(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

/// Payload for updating a member. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MemberPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership_status: Option<Role>,
}

impl From<MemberDraft> for MemberPatch {
    fn from(draft: MemberDraft) -> Self {
        Self {
            first_name: Some(draft.first_name),
            last_name: Some(draft.last_name),
            email: Some(draft.email),
            phone: Some(draft.phone),
            address: Some(draft.address),
            birth_date: Some(draft.birth_date),
            join_date: Some(draft.join_date),
            membership_status: Some(draft.membership_status),
        }
    }
}

/// Marker for the `/members` resource.
pub struct Members;

impl Resource for Members {
    const PATH: &'static str = "/members";
    const PLURAL: &'static str = "members";
    const SINGULAR: &'static str = "member";
    type Id = MemberId;
    type Record = Member;
    type Draft = MemberDraft;
    type Patch = MemberPatch;
}
