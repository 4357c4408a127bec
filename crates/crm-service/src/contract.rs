// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Contracts and payments.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crm_auth::{Guard, GuardedArgs, Keyed};
use crm_core::{Contract, CrmError, CrmResult, Database, RecordId};

use crate::fields;
use crate::rules;

/// A contract to create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContract {
    /// Client the contract belongs to.
    pub client_id: RecordId,
    /// Total amount.
    pub total_amount: f64,
    /// Amount still due; defaults to the total.
    #[serde(default)]
    pub remaining_amount: Option<f64>,
    /// Whether the client already signed.
    #[serde(default)]
    pub signed: bool,
}

impl GuardedArgs for NewContract {}

// =============================================================================
// ContractService
// =============================================================================

/// Contract operations.
#[derive(Debug, Clone)]
pub struct ContractService {
    db: Arc<Database>,
    guard: Guard,
}

impl ContractService {
    /// Creates the service.
    pub fn new(db: Arc<Database>, guard: Guard) -> Self {
        Self { db, guard }
    }

    /// Lists contracts.
    pub fn list(&self) -> CrmResult<Vec<Contract>> {
        self.guard.call(&rules::CONTRACT_READ, (), |_| {
            Ok(self.db.read().contracts().cloned().collect())
        })
    }

    /// Returns one contract.
    pub fn get(&self, pk: RecordId) -> CrmResult<Contract> {
        self.guard.call(&rules::CONTRACT_READ, pk, |inv| {
            self.db
                .read()
                .contract(inv.args)
                .cloned()
                .ok_or_else(|| CrmError::not_found("Contract", inv.args))
        })
    }

    /// Creates a contract for a client.
    pub fn create(&self, new: NewContract) -> CrmResult<Contract> {
        self.guard.call(&rules::CONTRACT_CREATE, new, |inv| {
            let new = inv.args;
            let mut scope = self.db.write();
            let id = scope.insert_contract(Contract {
                id: 0,
                client_id: new.client_id,
                total_amount: new.total_amount,
                remaining_amount: new.remaining_amount.unwrap_or(new.total_amount),
                signed: new.signed,
                created_at: Utc::now(),
            })?;
            let created = scope.contract_mut(id)?.clone();
            scope.commit()?;
            info!(contract = id, client = created.client_id, "Contract created");
            Ok(created)
        })
    }

    /// Deletes a contract with its events.
    pub fn delete(&self, pk: RecordId) -> CrmResult<Contract> {
        self.guard.call(&rules::CONTRACT_DELETE, pk, |inv| {
            let mut scope = self.db.write();
            let removed = scope.remove_contract(inv.args)?;
            scope.commit()?;
            info!(contract = pk, "Contract deleted");
            Ok(removed)
        })
    }

    /// Marks a contract as signed.
    pub fn sign(&self, pk: RecordId) -> CrmResult<Contract> {
        self.modify(&rules::CONTRACT_SIGN, Keyed::new(pk, ()), |contract, ()| {
            if contract.signed {
                return Err(CrmError::validation("signed", "contract is already signed"));
            }
            contract.signed = true;
            Ok(())
        })
    }

    /// Changes the total; the amount already paid is kept.
    pub fn modify_total(&self, pk: RecordId, total: f64) -> CrmResult<Contract> {
        self.modify(
            &rules::CONTRACT_MODIFY_TOTAL,
            Keyed::new(pk, total),
            |contract, total| {
                fields::amount("total_amount", total)?;
                let paid = contract.total_amount - contract.remaining_amount;
                if total < paid {
                    return Err(CrmError::validation(
                        "total_amount",
                        format!("must cover the {:.2} already paid", paid),
                    ));
                }
                contract.total_amount = total;
                contract.remaining_amount = total - paid;
                Ok(())
            },
        )
    }

    /// Records a payment against the remaining amount.
    pub fn pay(&self, pk: RecordId, amount: f64) -> CrmResult<Contract> {
        self.modify(&rules::CONTRACT_PAY, Keyed::new(pk, amount), |contract, amount| {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(CrmError::validation("amount", "must be a positive amount"));
            }
            if amount > contract.remaining_amount {
                return Err(CrmError::validation(
                    "amount",
                    format!("exceeds the remaining {:.2}", contract.remaining_amount),
                ));
            }
            contract.remaining_amount -= amount;
            Ok(())
        })
    }

    fn modify<T, F>(&self, rule: &crm_auth::Rule, args: Keyed<T>, change: F) -> CrmResult<Contract>
    where
        T: Serialize,
        F: FnOnce(&mut Contract, T) -> CrmResult<()>,
    {
        self.guard.call(rule, args, |inv| {
            let Keyed { pk, data } = inv.args;
            let mut scope = self.db.write();
            let contract = scope.contract_mut(pk)?;
            change(contract, data)?;
            contract.validate()?;
            let updated = contract.clone();
            scope.commit()?;
            info!(contract = pk, "Contract updated");
            Ok(updated)
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use crm_core::Denial;

    fn service(as_id: RecordId) -> (Arc<Database>, ContractService) {
        let db = seeded();
        let guard = guard_as(&db, as_id);
        (db.clone(), ContractService::new(db, guard))
    }

    #[test]
    fn test_create_defaults_remaining_to_total() {
        let (_, contracts) = service(MIA);
        let created = contracts
            .create(NewContract {
                client_id: CLIENT_FREE,
                total_amount: 500.0,
                remaining_amount: None,
                signed: false,
            })
            .unwrap();
        assert_eq!(created.remaining_amount, 500.0);

        let err = contracts
            .create(NewContract {
                client_id: CLIENT_FREE,
                total_amount: 500.0,
                remaining_amount: Some(900.0),
                signed: false,
            })
            .unwrap_err();
        assert!(matches!(err, CrmError::Validation { .. }));
    }

    #[test]
    fn test_create_requires_management() {
        let (_, contracts) = service(SAM);
        let err = contracts
            .create(NewContract {
                client_id: CLIENT_SAM,
                total_amount: 1.0,
                remaining_amount: None,
                signed: false,
            })
            .unwrap_err();
        assert!(matches!(err.denial(), Some(Denial::Rbac { .. })));
    }

    #[test]
    fn test_sign() {
        let (_, contracts) = service(SAM);
        assert!(contracts.sign(CONTRACT_UNSIGNED).unwrap().signed);
        assert!(matches!(contracts.sign(CONTRACT_SIGNED), Err(CrmError::Validation { .. })));

        let (_, contracts) = service(SUE);
        let err = contracts.sign(CONTRACT_UNSIGNED).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Permission error (ABAC) in (is_sales and is_contract_associated_salesman)"
        );
    }

    #[test]
    fn test_pay() {
        let (db, contracts) = service(SAM);
        assert_eq!(contracts.pay(CONTRACT_SIGNED, 100.0).unwrap().remaining_amount, 500.0);
        assert!(contracts.pay(CONTRACT_SIGNED, 0.0).is_err());
        assert!(contracts.pay(CONTRACT_SIGNED, 500.5).is_err());
        assert_eq!(db.read().contract(CONTRACT_SIGNED).unwrap().remaining_amount, 500.0);
    }

    #[test]
    fn test_modify_total_keeps_paid() {
        let (_, contracts) = service(SAM);
        // 400 already paid
        let updated = contracts.modify_total(CONTRACT_SIGNED, 1500.0).unwrap();
        assert_eq!(updated.total_amount, 1500.0);
        assert_eq!(updated.remaining_amount, 1100.0);

        assert!(contracts.modify_total(CONTRACT_SIGNED, 300.0).is_err());
        assert_eq!(contracts.modify_total(CONTRACT_SIGNED, 400.0).unwrap().remaining_amount, 0.0);
    }

    #[test]
    fn test_delete() {
        let (_, contracts) = service(MIA);
        // the client has a salesman, so management cannot delete
        assert!(contracts.delete(CONTRACT_SIGNED).is_err());

        let (_, contracts) = service(SAM);
        contracts.delete(CONTRACT_SIGNED).unwrap();
        assert!(contracts.get(CONTRACT_SIGNED).is_err());
    }
}
