//! A [`DeployHost`] backed by an in-memory revm instance.

mod config;
pub use config::*;

use alloy_primitives::{Address, Bytes, TxKind, B256, U256};
use revm::{
    context::{
        result::{ExecutionResult, Output},
        BlockEnv, CfgEnv, TxEnv,
    },
    database::{AccountState, CacheDB, EmptyDB},
    database_interface::DatabaseRef,
    primitives::hardfork::SpecId,
    state::{AccountInfo, Bytecode},
    Context, ExecuteCommitEvm, MainBuilder, MainContext,
};
use serde::Serialize;
use tracing::{debug, trace};

use crate::{constants::create2_proxy, DeployHost};

/// Errors from the revm-backed host. Execution failures such as reverts are not errors, they are
/// reported as unsuccessful outcomes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvmHostError {
    /// The transaction was rejected before execution, e.g. the sender cannot afford the value.
    #[error("transaction rejected: {0}")]
    Transaction(String),
}

/// The result of a message call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallOutcome {
    /// Whether the call returned normally.
    pub success: bool,
    /// Return data on success, revert data on revert, empty on halt.
    pub output: Bytes,
    /// Gas used by the transaction.
    pub gas_used: u64,
}

/// An in-memory EVM that deploys and drives clones.
///
/// The canonical deterministic-deployment proxy is installed at construction, so `create2`
/// deployments derive their addresses from [`create2_proxy::ADDRESS`].
#[derive(Debug, Clone, derive_more::Deref, derive_more::DerefMut)]
pub struct EvmHost {
    #[deref]
    #[deref_mut]
    db: CacheDB<EmptyDB>,
    config: EvmHostConfig,
}

impl Default for EvmHost {
    fn default() -> Self {
        Self::new(EvmHostConfig::default())
    }
}

impl EvmHost {
    /// Creates a new `EvmHost` with an empty state plus the deterministic-deployment proxy.
    pub fn new(config: EvmHostConfig) -> Self {
        let mut host = Self { db: CacheDB::default(), config };
        host.set_code(create2_proxy::ADDRESS, create2_proxy::CODE);
        host
    }

    /// Returns the configuration of this host.
    pub const fn config(&self) -> &EvmHostConfig {
        &self.config
    }

    /// Sets the code of an account.
    pub fn set_code(&mut self, address: Address, code: Bytes) {
        let bytecode = Bytecode::new_legacy(code);
        let code_hash = bytecode.hash_slow();
        let Ok(account) = self.db.load_account(address);
        account.info.code = Some(bytecode);
        account.info.code_hash = code_hash;
        account.account_state = AccountState::None;
    }

    /// Credits `amount` to the balance of an account.
    pub fn fund(&mut self, address: Address, amount: U256) {
        let Ok(account) = self.db.load_account(address);
        account.info.balance = account.info.balance.saturating_add(amount);
        account.account_state = AccountState::None;
    }

    /// Returns the account at `address`, or `None` if it was never touched.
    pub fn account(&self, address: Address) -> Option<AccountInfo> {
        let Ok(info) = self.db.basic_ref(address);
        info
    }

    /// Returns the balance of an account.
    pub fn balance(&self, address: Address) -> U256 {
        self.account(address).map(|info| info.balance).unwrap_or_default()
    }

    /// Returns the code deployed at `address`, empty if there is none.
    pub fn code_at(&self, address: Address) -> Bytes {
        let Some(info) = self.account(address) else { return Bytes::new() };
        let code = match info.code {
            Some(code) => code,
            None => {
                let Ok(code) = self.db.code_by_hash_ref(info.code_hash);
                code
            }
        };
        code.original_bytes()
    }

    /// Sends a message call from the configured deployer account and commits its state changes.
    pub fn call(
        &mut self,
        to: Address,
        data: Bytes,
        value: U256,
    ) -> Result<CallOutcome, EvmHostError> {
        let result = self.transact(TxKind::Call(to), data, value)?;
        Ok(CallOutcome {
            success: result.is_success(),
            output: result.output().cloned().unwrap_or_default(),
            gas_used: result.gas_used(),
        })
    }

    fn transact(
        &mut self,
        kind: TxKind,
        data: Bytes,
        value: U256,
    ) -> Result<ExecutionResult, EvmHostError> {
        let caller = self.config.deployer;
        let nonce = self.account(caller).map(|info| info.nonce).unwrap_or_default();

        let mut cfg = CfgEnv::new_with_spec(SpecId::PRAGUE);
        cfg.limit_contract_code_size = Some(self.config.max_code_size);
        cfg.limit_contract_initcode_size = Some(self.config.max_code_size.saturating_mul(2));
        let block = BlockEnv { gas_limit: self.config.gas_limit, ..Default::default() };
        let tx = TxEnv {
            caller,
            kind,
            data,
            value,
            nonce,
            gas_limit: self.config.gas_limit,
            ..Default::default()
        };

        let mut evm = Context::mainnet()
            .with_db(&mut self.db)
            .with_cfg(cfg)
            .with_block(block)
            .build_mainnet();
        let result =
            evm.transact_commit(tx).map_err(|err| EvmHostError::Transaction(err.to_string()))?;
        trace!(
            ?kind,
            %caller,
            nonce,
            success = result.is_success(),
            gas_used = result.gas_used(),
            "Executed transaction"
        );
        Ok(result)
    }
}

impl DeployHost for EvmHost {
    type Error = EvmHostError;

    fn deterministic_deployer(&self) -> Address {
        create2_proxy::ADDRESS
    }

    fn create(&mut self, init_code: Bytes, value: U256) -> Result<Option<Address>, Self::Error> {
        let result = self.transact(TxKind::Create, init_code, value)?;
        match result {
            ExecutionResult::Success { output: Output::Create(_, address), .. } => Ok(address),
            result => {
                debug!(?result, "CREATE did not produce a contract");
                Ok(None)
            }
        }
    }

    fn create2(
        &mut self,
        init_code: Bytes,
        salt: B256,
        value: U256,
    ) -> Result<Option<Address>, Self::Error> {
        let mut data = Vec::with_capacity(B256::len_bytes() + init_code.len());
        data.extend_from_slice(salt.as_slice());
        data.extend_from_slice(&init_code);

        let outcome = self.call(create2_proxy::ADDRESS, data.into(), value)?;
        if !outcome.success || outcome.output.len() != Address::len_bytes() {
            debug!(%salt, output = %outcome.output, "CREATE2 did not produce a contract");
            return Ok(None);
        }
        Ok(Some(Address::from_slice(&outcome.output)))
    }

    fn is_occupied(&mut self, address: Address) -> Result<bool, Self::Error> {
        let occupied = self
            .account(address)
            .is_some_and(|info| info.nonce != 0 || !self.code_at(address).is_empty());
        Ok(occupied)
    }
}
