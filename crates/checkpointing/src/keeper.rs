use std::{fmt, sync::Arc};

use anchor_checkpoint_types::{
    BlockContext, CheckpointRecord, CheckpointStatus, ValidatorSet, ValidatorWithBlsKey,
};
use anchor_config::CheckpointingParams;
use anchor_crypto::BlsPubKey;
use anchor_db_types::traits::{BlsKeyDatabase, CheckpointDatabase};
use anchor_primitives::{AppHash, Epoch, ValAddress};
use tracing::*;

use crate::{
    CheckpointStore, CheckpointingError, CheckpointingHooks, CheckpointingResult, EpochProvider,
    ValidatorRegistry,
};

/// Entry point of the checkpointing core.
///
/// Owns the checkpoint store and the validator key registry, reads validator
/// sets from the host through `P`, and reports events to the installed hooks.
/// Signature accumulation, external verification and lifecycle transitions are
/// implemented in their own modules on top of this type.
pub struct CheckpointKeeper<C, K, P> {
    pub(crate) store: CheckpointStore<C>,
    pub(crate) registry: ValidatorRegistry<K>,
    pub(crate) epochs: P,
    pub(crate) params: CheckpointingParams,
    hooks: Option<Arc<dyn CheckpointingHooks>>,
}

impl<C, K, P> fmt::Debug for CheckpointKeeper<C, K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckpointKeeper")
            .field("params", &self.params)
            .field("hooks_set", &self.hooks.is_some())
            .finish_non_exhaustive()
    }
}

impl<C, K, P> CheckpointKeeper<C, K, P>
where
    C: CheckpointDatabase,
    K: BlsKeyDatabase,
    P: EpochProvider,
{
    /// Creates a keeper without hooks.
    ///
    /// Fails with [`CheckpointingError::InvalidParams`] if `params` do not
    /// pass validation.
    pub fn new(
        checkpoint_db: Arc<C>,
        key_db: Arc<K>,
        epochs: P,
        params: CheckpointingParams,
    ) -> CheckpointingResult<Self> {
        params.validate()?;
        Ok(Self {
            store: CheckpointStore::new(checkpoint_db),
            registry: ValidatorRegistry::new(key_db),
            epochs,
            params,
            hooks: None,
        })
    }

    /// Installs the hooks. Can only be done once.
    pub fn set_hooks(&mut self, hooks: Arc<dyn CheckpointingHooks>) -> CheckpointingResult<()> {
        if self.hooks.is_some() {
            return Err(CheckpointingError::HooksAlreadySet);
        }
        self.hooks = Some(hooks);
        Ok(())
    }

    pub fn params(&self) -> &CheckpointingParams {
        &self.params
    }

    /// Creates the `Accumulating` checkpoint for an epoch that just ended.
    pub fn build_checkpoint(
        &self,
        epoch: Epoch,
        app_hash: AppHash,
        ctx: &BlockContext,
    ) -> CheckpointingResult<CheckpointRecord> {
        let record = self.store.create(epoch, app_hash, ctx)?;
        info!(%epoch, %app_hash, height = ctx.height, "built checkpoint");
        Ok(record)
    }

    pub fn get_checkpoint(&self, epoch: Epoch) -> CheckpointingResult<CheckpointRecord> {
        self.store.get(epoch)
    }

    pub fn get_status(&self, epoch: Epoch) -> CheckpointingResult<CheckpointStatus> {
        self.store.status(epoch)
    }

    pub fn last_checkpoint_epoch(&self) -> CheckpointingResult<Option<Epoch>> {
        self.store.last_epoch()
    }

    pub fn register_bls_key(&self, addr: ValAddress, key: BlsPubKey) -> CheckpointingResult<()> {
        self.registry.register(addr, key)
    }

    pub fn get_bls_pubkey(&self, addr: ValAddress) -> CheckpointingResult<BlsPubKey> {
        self.registry.lookup(addr)
    }

    /// Validators of `epoch` with their registered keys, in validator-set order.
    pub fn get_bls_pubkey_set(&self, epoch: Epoch) -> CheckpointingResult<Vec<ValidatorWithBlsKey>> {
        self.validator_set(epoch)?
            .iter()
            .map(|v| -> CheckpointingResult<_> {
                let bls_key = self
                    .registry
                    .get(v.address)?
                    .ok_or(CheckpointingError::UnregisteredSigner(v.address))?;
                Ok(ValidatorWithBlsKey {
                    address: v.address,
                    bls_key,
                    power: v.power,
                })
            })
            .collect()
    }

    pub(crate) fn validator_set(&self, epoch: Epoch) -> CheckpointingResult<ValidatorSet> {
        self.epochs
            .validator_set(epoch)
            .ok_or(CheckpointingError::MissingValidatorSet(epoch))
    }

    /// Total voting power of `epoch` as reported by the host, which the quorum
    /// is measured against.
    pub(crate) fn total_power(&self, epoch: Epoch) -> CheckpointingResult<u64> {
        self.epochs
            .total_voting_power(epoch)
            .ok_or(CheckpointingError::MissingValidatorSet(epoch))
    }

    /// Runs `f` on the installed hooks, if any.
    pub(crate) fn notify(&self, f: impl FnOnce(&dyn CheckpointingHooks)) {
        if let Some(hooks) = &self.hooks {
            f(hooks.as_ref());
        }
    }
}
