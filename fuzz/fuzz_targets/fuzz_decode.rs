#![no_main]

use libfuzzer_sys::fuzz_target;
use wire_router::core::any::{Any, TypeRegistry};
use wire_router::core::wire::Message;
use wire_router::protocol::messages::{register_fee_grant_types, MsgGrantFeeAllowance};

fuzz_target!(|data: &[u8]| {
    // Anything that decodes must re-encode and decode to the same value
    if let Ok(msg) = MsgGrantFeeAllowance::decode(data) {
        let bytes = msg.encode().expect("decoded message must encode");
        let again = MsgGrantFeeAllowance::decode(&bytes).expect("re-encoded bytes must decode");
        assert_eq!(again, msg);
    }

    // Resolving arbitrary payloads against the registry must not panic
    let mut registry = TypeRegistry::new();
    if register_fee_grant_types(&mut registry).is_ok() {
        let any = Any::new("/cosmos.feegrant.v1beta1.MsgGrantFeeAllowance", data.to_vec());
        let _ = registry.resolve(&any);
    }
});
