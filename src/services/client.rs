//! Client roster service
//!
//! High-level operations over the client roster: creation with unique
//! trading codes, profile updates, calling-status transitions with their
//! conditional values, and derived roster statistics.

use crate::error::{TrailError, TrailResult};
use crate::models::{
    AccountStatus, CallingStatus, Client, ClientId, ConditionalField, FieldKind, FieldValue,
};
use crate::storage::Storage;

/// Aggregate counts derived from the roster on demand
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterStats {
    /// Number of clients in the roster
    pub total: usize,
    /// Clients with an active account
    pub active: usize,
    /// Clients with an inactive account
    pub inactive: usize,
    /// Clients not yet called
    pub not_called: usize,
    /// Clients awaiting a follow-up call
    pub follow_up: usize,
    /// Clients who committed to a payment
    pub payment_committed: usize,
    /// Clients whose payment arrived
    pub payment_received: usize,
    /// Clients who declined
    pub not_interested: usize,
    /// Sum of committed amounts
    pub committed_total: f64,
    /// Sum of received amounts
    pub received_total: f64,
}

/// Service for managing the client roster
pub struct ClientService<'a> {
    storage: &'a Storage,
}

impl<'a> ClientService<'a> {
    /// Creates a new client service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Creates a new client with the next sequential id.
    ///
    /// Trading codes are stored uppercase and must be unique across the
    /// roster, compared case-insensitively.
    pub fn create(
        &self,
        trading_code: &str,
        name: &str,
        mobile_no: &str,
        email: Option<&str>,
    ) -> TrailResult<Client> {
        let trading_code = trading_code.trim().to_uppercase();
        if trading_code.is_empty() {
            return Err(TrailError::Validation(
                "Trading code cannot be empty".to_string(),
            ));
        }

        if self
            .storage
            .clients
            .trading_code_exists(&trading_code, None)?
        {
            return Err(TrailError::duplicate_trading_code(trading_code));
        }

        let id = self.storage.clients.next_id()?;
        let mut client = Client::new(id, trading_code, name.trim(), mobile_no.trim());
        client.email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(String::from);

        client
            .validate()
            .map_err(|e| TrailError::Validation(e.to_string()))?;

        self.storage.clients.upsert(client.clone())?;
        self.storage.clients.save()?;

        Ok(client)
    }

    /// Gets a client by id
    pub fn get(&self, id: ClientId) -> TrailResult<Option<Client>> {
        self.storage.clients.get(id)
    }

    /// Finds a client by trading code or id string.
    ///
    /// Tries the trading code first, then falls back to parsing the
    /// identifier as a client id.
    pub fn find(&self, identifier: &str) -> TrailResult<Option<Client>> {
        if let Some(client) = self.storage.clients.get_by_trading_code(identifier)? {
            return Ok(Some(client));
        }

        if let Ok(id) = identifier.parse::<ClientId>() {
            return self.storage.clients.get(id);
        }

        Ok(None)
    }

    /// Lists all clients, ordered by id
    pub fn list(&self) -> TrailResult<Vec<Client>> {
        self.storage.clients.get_all()
    }

    /// Searches clients by a case-insensitive substring.
    ///
    /// Matches against trading code, name, mobile number and email. A
    /// blank query returns the full roster.
    pub fn search(&self, query: &str) -> TrailResult<Vec<Client>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.list();
        }

        let matches = self
            .list()?
            .into_iter()
            .filter(|c| {
                c.trading_code.to_lowercase().contains(&query)
                    || c.name.to_lowercase().contains(&query)
                    || c.mobile_no.to_lowercase().contains(&query)
                    || c.email
                        .as_deref()
                        .is_some_and(|e| e.to_lowercase().contains(&query))
            })
            .collect();

        Ok(matches)
    }

    /// Lists clients with the given account status
    pub fn filter_by_account_status(&self, status: AccountStatus) -> TrailResult<Vec<Client>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|c| c.account_status == status)
            .collect())
    }

    /// Lists clients with the given calling status
    pub fn filter_by_calling_status(&self, status: CallingStatus) -> TrailResult<Vec<Client>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|c| c.calling_status == status)
            .collect())
    }

    /// Updates a client's profile fields.
    ///
    /// Only the provided fields change. An empty email clears the stored
    /// address. The trading code is updated when given and stays unique.
    pub fn update(
        &self,
        id: ClientId,
        trading_code: Option<&str>,
        name: Option<&str>,
        mobile_no: Option<&str>,
        email: Option<&str>,
    ) -> TrailResult<Client> {
        let mut client = self
            .storage
            .clients
            .get(id)?
            .ok_or_else(|| TrailError::client_not_found(id.to_string()))?;

        if let Some(code) = trading_code {
            let code = code.trim().to_uppercase();
            if self.storage.clients.trading_code_exists(&code, Some(id))? {
                return Err(TrailError::duplicate_trading_code(code));
            }
            client.trading_code = code;
        }

        if let Some(name) = name {
            client.name = name.trim().to_string();
        }

        if let Some(mobile) = mobile_no {
            client.mobile_no = mobile.trim().to_string();
        }

        if let Some(email) = email {
            let email = email.trim();
            client.email = if email.is_empty() {
                None
            } else {
                Some(email.to_string())
            };
        }

        client.updated_at = chrono::Utc::now();
        client
            .validate()
            .map_err(|e| TrailError::Validation(e.to_string()))?;

        self.storage.clients.upsert(client.clone())?;
        self.storage.clients.save()?;

        Ok(client)
    }

    /// Moves a client to a new calling status.
    ///
    /// Every conditional field the target status declares must be supplied
    /// with a value of the matching kind; values for fields the status does
    /// not declare are rejected. Changing status drops values that belonged
    /// to the previous status before the new ones are applied.
    pub fn set_calling_status(
        &self,
        id: ClientId,
        status: CallingStatus,
        values: &[(ConditionalField, FieldValue)],
    ) -> TrailResult<Client> {
        let mut client = self
            .storage
            .clients
            .get(id)?
            .ok_or_else(|| TrailError::client_not_found(id.to_string()))?;

        let descriptors = status.conditional_fields();
        for (field, value) in values {
            let descriptor = descriptors
                .iter()
                .find(|d| d.field == *field)
                .ok_or_else(|| {
                    TrailError::Validation(format!("Field is not used by status '{}'", status))
                })?;
            if descriptor.kind != value.kind() {
                return Err(TrailError::Validation(format!(
                    "{} expects a {}",
                    descriptor.label,
                    match descriptor.kind {
                        FieldKind::Date => "date",
                        FieldKind::Amount => "amount",
                    }
                )));
            }
        }

        for descriptor in descriptors {
            if !values.iter().any(|(f, _)| *f == descriptor.field) {
                return Err(TrailError::Validation(format!(
                    "{} is required for status '{}'",
                    descriptor.label, status
                )));
            }
        }

        client.set_calling_status(status);
        for (field, value) in values {
            match value {
                FieldValue::Date(date) => client.set_conditional_date(*field, *date),
                FieldValue::Amount(amount) => client.set_conditional_amount(*field, *amount),
            }
        }

        self.storage.clients.upsert(client.clone())?;
        self.storage.clients.save()?;

        Ok(client)
    }

    /// Moves a client to a new account status, resetting calling-workflow
    /// values when the status actually changes
    pub fn set_account_status(&self, id: ClientId, status: AccountStatus) -> TrailResult<Client> {
        let mut client = self
            .storage
            .clients
            .get(id)?
            .ok_or_else(|| TrailError::client_not_found(id.to_string()))?;

        client.set_account_status(status);

        self.storage.clients.upsert(client.clone())?;
        self.storage.clients.save()?;

        Ok(client)
    }

    /// Deletes a client from the roster
    pub fn delete(&self, id: ClientId) -> TrailResult<()> {
        if !self.storage.clients.delete(id)? {
            return Err(TrailError::client_not_found(id.to_string()));
        }
        self.storage.clients.save()?;
        Ok(())
    }

    /// Computes roster statistics from the current collection
    pub fn stats(&self) -> TrailResult<RosterStats> {
        let clients = self.list()?;
        let mut stats = RosterStats {
            total: clients.len(),
            ..RosterStats::default()
        };

        for client in &clients {
            match client.account_status {
                AccountStatus::Active => stats.active += 1,
                AccountStatus::Inactive => stats.inactive += 1,
            }
            match client.calling_status {
                CallingStatus::NotCalled => stats.not_called += 1,
                CallingStatus::FollowUp => stats.follow_up += 1,
                CallingStatus::PaymentCommitted => stats.payment_committed += 1,
                CallingStatus::PaymentReceived => stats.payment_received += 1,
                CallingStatus::NotInterested => stats.not_interested += 1,
            }
            if let Some(amount) = client.committed_amount {
                stats.committed_total += amount;
            }
            if let Some(amount) = client.received_amount {
                stats.received_total += amount;
            }
        }

        Ok(stats)
    }
}
