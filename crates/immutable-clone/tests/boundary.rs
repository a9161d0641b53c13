//! Tests for the largest argument blob a clone can carry.

use alloy_primitives::{Bytes, B256, U256};
use immutable_clone::{
    constants::stub::{MAX_ARGS_LEN, RUNTIME_CODE_LEN, SUFFIX_LEN},
    implementation_of,
    test_utils::{factory_with_implementation, BytecodeBuilder, IMPLEMENTATION},
    DeployError, ImmutableArgs,
};

fn max_args() -> Vec<u8> {
    (0..MAX_ARGS_LEN).map(|i| (i % 255) as u8 + 1).collect()
}

#[test]
fn test_largest_blob_deploys_and_reads_back() {
    let mut factory =
        factory_with_implementation(BytecodeBuilder::default().echo_calldata().build());
    let args = max_args();

    let clone = factory.deploy_deterministic(IMPLEMENTATION, &args, B256::ZERO).unwrap();
    let code = factory.host().code_at(clone);
    assert_eq!(code.len(), RUNTIME_CODE_LEN + MAX_ARGS_LEN + SUFFIX_LEN);
    assert_eq!(code[code.len() - SUFFIX_LEN..], [0xff, 0xff]);
    assert_eq!(implementation_of(&code), Some(IMPLEMENTATION));

    let outcome = factory.host_mut().call(clone, Bytes::from_static(b"\x01"), U256::ZERO).unwrap();
    assert!(outcome.success);
    let reader = ImmutableArgs::from_calldata(&outcome.output);
    assert_eq!(reader.args_offset(), 1);
    assert_eq!(reader.args_len(), MAX_ARGS_LEN);
    assert_eq!(reader.blob(), &args[..]);
    assert_eq!(reader.read_u8(MAX_ARGS_LEN - 1), args[MAX_ARGS_LEN - 1]);
}

#[test]
fn test_one_byte_too_many_is_rejected() {
    let mut factory =
        factory_with_implementation(BytecodeBuilder::default().echo_calldata().build());
    let mut args = max_args();
    args.push(0);
    let err = DeployError::ArgsTooLarge { len: MAX_ARGS_LEN + 1, max: MAX_ARGS_LEN };

    assert_eq!(factory.deploy(IMPLEMENTATION, &args), Err(err.clone()));
    assert_eq!(factory.deploy_deterministic(IMPLEMENTATION, &args, B256::ZERO), Err(err.clone()));
    assert_eq!(factory.predict_deterministic_address(IMPLEMENTATION, &args, B256::ZERO), Err(err));
    // Nothing was sent: the deployer nonce is untouched.
    let deployer = factory.host().config().deployer;
    assert_eq!(factory.host().account(deployer).map(|info| info.nonce), Some(0));
}
