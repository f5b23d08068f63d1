//! Loans.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Book, BookId, Member, MemberId, Resource, Validate};
use crate::ValidationError;

/// A loan's id (`LoanID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(pub i64);

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A loan as returned by the API, optionally with the borrowed book and
/// the borrowing member joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Loan {
    #[serde(rename = "LoanID")]
    pub id: LoanId,
    #[serde(rename = "BookID")]
    pub book_id: BookId,
    #[serde(rename = "MemberID")]
    pub member_id: MemberId,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    pub returned: bool,
    #[serde(rename = "book", default, skip_serializing_if = "Option::is_none")]
    pub book: Option<Book>,
    #[serde(rename = "member", default, skip_serializing_if = "Option::is_none")]
    pub member: Option<Member>,
}

impl Loan {
    /// A loan counts as returned if the API flags it or a return date is
    /// recorded.
    pub fn is_returned(&self) -> bool {
        self.returned || self.return_date.is_some()
    }

    /// Returns `true` if the loan is still out after its due date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_returned() && today > self.due_date
    }
}

/// Payload for creating a loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoanDraft {
    #[serde(rename = "BookID")]
    pub book_id: BookId,
    #[serde(rename = "MemberID")]
    pub member_id: MemberId,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
}

impl Validate for LoanDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.due_date < self.loan_date {
            return Err(ValidationError::new("DueDate", "is before LoanDate"));
        }
        if let Some(returned) = self.return_date {
            if returned < self.loan_date {
                return Err(ValidationError::new("ReturnDate", "is before LoanDate"));
            }
        }
        Ok(())
    }
}

/// Payload for updating a loan. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoanPatch {
    #[serde(rename = "BookID", skip_serializing_if = "Option::is_none")]
    pub book_id: Option<BookId>,
    #[serde(rename = "MemberID", skip_serializing_if = "Option::is_none")]
    pub member_id: Option<MemberId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
}

impl LoanPatch {
    /// A patch that only records the return date.
    pub fn returned_on(date: NaiveDate) -> Self {
        Self {
            return_date: Some(date),
            ..Self::default()
        }
    }
}

impl From<LoanDraft> for LoanPatch {
    fn from(draft: LoanDraft) -> Self {
        Self {
            book_id: Some(draft.book_id),
            member_id: Some(draft.member_id),
            loan_date: Some(draft.loan_date),
            due_date: Some(draft.due_date),
            return_date: draft.return_date,
        }
    }
}

/// Marker for the `/loans` resource.
pub struct Loans;

impl Resource for Loans {
    const PATH: &'static str = "/loans";
    const PLURAL: &'static str = "loans";
    const SINGULAR: &'static str = "loan";
    type Id = LoanId;
    type Record = Loan;
    type Draft = LoanDraft;
    type Patch = LoanPatch;
}
