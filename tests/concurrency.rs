//! A router shared behind an `Arc` serves queries from many threads.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::thread;

use wire_router::core::wire::Message;
use wire_router::protocol::messages::MsgRevokeFeeAllowance;
use wire_router::protocol::{querier, QueryContext, QueryInvoker, QueryRouter};

const THREADS: usize = 8;
const ITERATIONS: usize = 5_000;

fn build_router() -> QueryRouter {
    let mut router = QueryRouter::new();
    router
        .add_route(
            "swap",
            querier(|_ctx, _path, data| {
                let mut msg = MsgRevokeFeeAllowance::decode(data)?;
                std::mem::swap(&mut msg.granter, &mut msg.grantee);
                Ok(msg.encode()?)
            }),
        )
        .unwrap();
    router
}

#[test]
fn concurrent_dispatch_shared_router() {
    let invoker = Arc::new(QueryInvoker::with_router(
        build_router(),
        QueryContext::default(),
    ));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let invoker = Arc::clone(&invoker);
            thread::spawn(move || {
                for i in 0..ITERATIONS {
                    let request = MsgRevokeFeeAllowance {
                        granter: vec![t as u8 + 1; (i % 64) + 1],
                        grantee: (i as u32).to_le_bytes().to_vec(),
                    };
                    let reply: MsgRevokeFeeAllowance =
                        invoker.invoke_message("/swap/Any", &request).unwrap();
                    assert_eq!(reply.granter, request.grantee);
                    assert_eq!(reply.grantee, request.granter);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let snap = invoker.router().metrics().snapshot();
    assert_eq!(snap.queries_total, (THREADS * ITERATIONS) as u64);
    assert_eq!(snap.queries_succeeded, (THREADS * ITERATIONS) as u64);
    assert_eq!(snap.queries_failed, 0);
    assert_eq!(snap.request_bytes, snap.response_bytes);
}

#[test]
fn concurrent_encode_decode_independent_buffers() {
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            thread::spawn(move || {
                for i in 0..ITERATIONS {
                    let msg = MsgRevokeFeeAllowance {
                        granter: vec![(i & 0xFF) as u8; t * 16 + 1],
                        grantee: vec![t as u8 + 1; (i % 128) + 1],
                    };
                    let bytes = msg.encode().unwrap();
                    assert_eq!(MsgRevokeFeeAllowance::decode(&bytes).unwrap(), msg);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
