//! Client model
//!
//! Represents a client in the local roster, including the calling workflow
//! status and the follow-up values that only exist for certain statuses.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ClientId;

/// Whether a client's account is live on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Account in good standing
    Active,
    /// Account disabled
    Inactive,
}

impl AccountStatus {
    /// Parse account status from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

impl Default for AccountStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Inactive => write!(f, "Inactive"),
        }
    }
}

/// Stage of the calling workflow for a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallingStatus {
    /// No call made yet
    NotCalled,
    /// Call made, follow-up scheduled
    FollowUp,
    /// Client committed to a payment
    PaymentCommitted,
    /// Payment received
    PaymentReceived,
    /// Client declined
    NotInterested,
}

impl CallingStatus {
    /// Parse calling status from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "not_called" | "notcalled" => Some(Self::NotCalled),
            "follow_up" | "followup" => Some(Self::FollowUp),
            "payment_committed" | "committed" => Some(Self::PaymentCommitted),
            "payment_received" | "received" => Some(Self::PaymentReceived),
            "not_interested" | "notinterested" => Some(Self::NotInterested),
            _ => None,
        }
    }

    /// The extra input fields this status requires, in display order.
    ///
    /// This single mapping drives both the editor (which fields to render)
    /// and the reset logic (which values are stale after a status change).
    pub fn conditional_fields(&self) -> &'static [FieldDescriptor] {
        match self {
            Self::FollowUp => &[FieldDescriptor {
                field: ConditionalField::FollowUpDate,
                label: "Follow-up Date",
                kind: FieldKind::Date,
            }],
            Self::PaymentCommitted => &[
                FieldDescriptor {
                    field: ConditionalField::CommittedAmount,
                    label: "Committed Amount",
                    kind: FieldKind::Amount,
                },
                FieldDescriptor {
                    field: ConditionalField::CommittedDate,
                    label: "Committed Date",
                    kind: FieldKind::Date,
                },
            ],
            Self::PaymentReceived => &[
                FieldDescriptor {
                    field: ConditionalField::ReceivedAmount,
                    label: "Received Amount",
                    kind: FieldKind::Amount,
                },
                FieldDescriptor {
                    field: ConditionalField::ReceivedDate,
                    label: "Received Date",
                    kind: FieldKind::Date,
                },
            ],
            Self::NotCalled | Self::NotInterested => &[],
        }
    }
}

impl Default for CallingStatus {
    fn default() -> Self {
        Self::NotCalled
    }
}

impl fmt::Display for CallingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotCalled => write!(f, "Not Called"),
            Self::FollowUp => write!(f, "Follow Up"),
            Self::PaymentCommitted => write!(f, "Payment Committed"),
            Self::PaymentReceived => write!(f, "Payment Received"),
            Self::NotInterested => write!(f, "Not Interested"),
        }
    }
}

/// Identifies one of the status-specific value slots on [`Client`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalField {
    FollowUpDate,
    CommittedAmount,
    CommittedDate,
    ReceivedAmount,
    ReceivedDate,
}

/// How a conditional field's value is entered and validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Calendar date (YYYY-MM-DD)
    Date,
    /// Monetary amount
    Amount,
}

/// A parsed value for one conditional slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// A calendar date
    Date(NaiveDate),
    /// A monetary amount
    Amount(f64),
}

impl FieldValue {
    /// The input kind this value satisfies
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Date(_) => FieldKind::Date,
            FieldValue::Amount(_) => FieldKind::Amount,
        }
    }
}

/// Describes one status-specific input field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Which value slot the input writes to
    pub field: ConditionalField,
    /// Label shown next to the input
    pub label: &'static str,
    /// Input kind, used to pick the parser
    pub kind: FieldKind,
}

/// A client tracked in the roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Roster-assigned identifier (e.g., "CL-0007")
    pub id: ClientId,

    /// Short trading code, unique and stored uppercase (e.g., "ACME")
    pub trading_code: String,

    /// Client name
    pub name: String,

    /// Contact number
    pub mobile_no: String,

    /// Contact email
    #[serde(default)]
    pub email: Option<String>,

    /// Whether the account is active
    pub account_status: AccountStatus,

    /// Where the client sits in the calling workflow
    pub calling_status: CallingStatus,

    /// Scheduled follow-up date (only while status is FollowUp)
    #[serde(default)]
    pub follow_up_date: Option<NaiveDate>,

    /// Amount the client committed to pay (only while PaymentCommitted)
    #[serde(default)]
    pub committed_amount: Option<f64>,

    /// Date the commitment was made (only while PaymentCommitted)
    #[serde(default)]
    pub committed_date: Option<NaiveDate>,

    /// Amount actually received (only while PaymentReceived)
    #[serde(default)]
    pub received_amount: Option<f64>,

    /// Date the payment arrived (only while PaymentReceived)
    #[serde(default)]
    pub received_date: Option<NaiveDate>,

    /// When the client was added to the roster
    pub created_at: DateTime<Utc>,

    /// When the client was last modified
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Create a new client with default statuses
    pub fn new(
        id: ClientId,
        trading_code: impl Into<String>,
        name: impl Into<String>,
        mobile_no: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            trading_code: trading_code.into(),
            name: name.into(),
            mobile_no: mobile_no.into(),
            email: None,
            account_status: AccountStatus::Active,
            calling_status: CallingStatus::NotCalled,
            follow_up_date: None,
            committed_amount: None,
            committed_date: None,
            received_amount: None,
            received_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Change the calling status, dropping values that belonged to the
    /// previous status. Values survive only when the status is unchanged.
    pub fn set_calling_status(&mut self, status: CallingStatus) {
        if status != self.calling_status {
            self.clear_conditional_fields();
            self.calling_status = status;
        }
        self.updated_at = Utc::now();
    }

    /// Change the account status. The conditional values describe the
    /// calling workflow of the current account state, so they reset too.
    pub fn set_account_status(&mut self, status: AccountStatus) {
        if status != self.account_status {
            self.clear_conditional_fields();
            self.account_status = status;
        }
        self.updated_at = Utc::now();
    }

    /// Clear every status-specific value
    pub fn clear_conditional_fields(&mut self) {
        self.follow_up_date = None;
        self.committed_amount = None;
        self.committed_date = None;
        self.received_amount = None;
        self.received_date = None;
    }

    /// Current value of a conditional slot, in its editable text form
    pub fn conditional_value(&self, field: ConditionalField) -> Option<String> {
        match field {
            ConditionalField::FollowUpDate => self.follow_up_date.map(|d| d.to_string()),
            ConditionalField::CommittedAmount => {
                self.committed_amount.map(|a| format!("{:.2}", a))
            }
            ConditionalField::CommittedDate => self.committed_date.map(|d| d.to_string()),
            ConditionalField::ReceivedAmount => self.received_amount.map(|a| format!("{:.2}", a)),
            ConditionalField::ReceivedDate => self.received_date.map(|d| d.to_string()),
        }
    }

    /// Write a parsed value into its conditional slot
    pub fn set_conditional_date(&mut self, field: ConditionalField, date: NaiveDate) {
        match field {
            ConditionalField::FollowUpDate => self.follow_up_date = Some(date),
            ConditionalField::CommittedDate => self.committed_date = Some(date),
            ConditionalField::ReceivedDate => self.received_date = Some(date),
            ConditionalField::CommittedAmount | ConditionalField::ReceivedAmount => {}
        }
        self.updated_at = Utc::now();
    }

    /// Write a parsed amount into its conditional slot
    pub fn set_conditional_amount(&mut self, field: ConditionalField, amount: f64) {
        match field {
            ConditionalField::CommittedAmount => self.committed_amount = Some(amount),
            ConditionalField::ReceivedAmount => self.received_amount = Some(amount),
            ConditionalField::FollowUpDate
            | ConditionalField::CommittedDate
            | ConditionalField::ReceivedDate => {}
        }
        self.updated_at = Utc::now();
    }

    /// Validate the client
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        if self.name.trim().is_empty() {
            return Err(ClientValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(ClientValidationError::NameTooLong(self.name.len()));
        }

        let code = self.trading_code.trim();
        if code.is_empty() {
            return Err(ClientValidationError::EmptyTradingCode);
        }

        if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ClientValidationError::InvalidTradingCode(code.to_string()));
        }

        let digits: String = self
            .mobile_no
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();
        let bare = digits.strip_prefix('+').unwrap_or(&digits);
        if bare.len() < 7 || bare.len() > 15 || !bare.chars().all(|c| c.is_ascii_digit()) {
            return Err(ClientValidationError::InvalidMobile(
                self.mobile_no.clone(),
            ));
        }

        if let Some(email) = &self.email {
            let ok = match email.split_once('@') {
                Some((local, domain)) => {
                    !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
                }
                None => false,
            };
            if !ok {
                return Err(ClientValidationError::InvalidEmail(email.clone()));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.trading_code)
    }
}

/// Validation errors for clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientValidationError {
    EmptyName,
    NameTooLong(usize),
    EmptyTradingCode,
    InvalidTradingCode(String),
    InvalidMobile(String),
    InvalidEmail(String),
}

impl fmt::Display for ClientValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Client name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Client name too long ({} chars, max 100)", len)
            }
            Self::EmptyTradingCode => write!(f, "Trading code cannot be empty"),
            Self::InvalidTradingCode(code) => {
                write!(f, "Trading code '{}' may only contain letters, digits and dashes", code)
            }
            Self::InvalidMobile(no) => write!(f, "'{}' is not a valid mobile number", no),
            Self::InvalidEmail(email) => write!(f, "'{}' is not a valid email address", email),
        }
    }
}

impl std::error::Error for ClientValidationError {}
