#![cfg(test)]

// Property tests for both table variants kept inside the crate so they can
// reach the shared `Table` contract and the private invariants together.

use crate::chaining::ChainedHashMap;
use crate::hash_fns::{hash_function_1, hash_function_2};
use crate::open_addressing::ProbingHashMap;
use crate::prime::is_prime;
use crate::table::Table;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Resize(usize),
    Clear,
    Collect,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => (0usize..64).prop_map(OpI::Resize),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Collect),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

/// Upper bound on the load factor a table holds between operations.
#[derive(Clone, Copy, Debug)]
enum LoadBound {
    Below(f64),
    AtMost(f64),
}

impl LoadBound {
    fn holds(self, load: f64) -> bool {
        match self {
            LoadBound::Below(max) => load < max,
            LoadBound::AtMost(max) => load <= max,
        }
    }
}

// State-machine equivalence against std::collections::HashMap.
// Invariants checked after every op:
// - get/contains_key/len agree with the model (last write wins, removal is
//   idempotent);
// - capacity is prime and the load bound holds;
// - resize leaves len and every value unchanged;
// - keys_and_values yields exactly the model's entries;
// - a non-empty table has at least one non-empty bucket.
fn run_scenario<T>(
    sut: &mut T,
    pool: &[String],
    ops: Vec<OpI>,
    bound: LoadBound,
) -> Result<(), TestCaseError>
where
    T: Table<i32>,
{
    let mut model: HashMap<String, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                sut.put(pool[i].clone(), v);
                model.insert(pool[i].clone(), v);
            }
            OpI::Remove(i) => {
                let removed = sut.remove_key(&pool[i]);
                prop_assert_eq!(removed, model.remove(&pool[i]).is_some());
                prop_assert!(!sut.contains_key(&pool[i]));
            }
            OpI::Get(i) => {
                prop_assert_eq!(sut.get(&pool[i]), model.get(&pool[i]));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Resize(n) => {
                let len = sut.len();
                sut.resize_table(n);
                prop_assert_eq!(sut.len(), len);
            }
            OpI::Clear => {
                let capacity = sut.capacity();
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), capacity);
                prop_assert_eq!(sut.empty_buckets(), capacity);
            }
            OpI::Collect => {
                let kv = sut.keys_and_values();
                prop_assert_eq!(kv.len(), sut.len());
                let collected: BTreeMap<String, i32> = kv.into_iter().collect();
                let expected: BTreeMap<String, i32> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(collected, expected);
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(is_prime(sut.capacity()), "capacity {} not prime", sut.capacity());
        prop_assert!(
            bound.holds(sut.table_load()),
            "load {} violates {:?}",
            sut.table_load(),
            bound
        );
        prop_assert!(sut.empty_buckets() <= sut.capacity() - usize::from(!sut.is_empty()));
        for (k, v) in &model {
            prop_assert_eq!(sut.get(k), Some(v));
        }
    }
    Ok(())
}

fn constant_hash(_: &str) -> u64 {
    0
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_chained_state_machine(cap in 1usize..40, (pool, ops) in arb_scenario()) {
        let mut sut = ChainedHashMap::new(cap, hash_function_1);
        run_scenario(&mut sut, &pool, ops, LoadBound::Below(1.0))?;
    }

    #[test]
    fn prop_probing_state_machine(cap in 1usize..40, (pool, ops) in arb_scenario()) {
        let mut sut = ProbingHashMap::new(cap, hash_function_2);
        run_scenario(&mut sut, &pool, ops, LoadBound::AtMost(0.5))?;
    }
}

// Same invariants under worst-case collisions: every key hashes to slot 0,
// so chaining builds one long chain and probing walks the full quadratic
// sequence through tombstones.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_chained_state_machine_with_collisions(cap in 1usize..40, (pool, ops) in arb_scenario()) {
        let mut sut = ChainedHashMap::new(cap, constant_hash);
        run_scenario(&mut sut, &pool, ops, LoadBound::Below(1.0))?;
    }

    #[test]
    fn prop_probing_state_machine_with_collisions(cap in 1usize..40, (pool, ops) in arb_scenario()) {
        let mut sut = ProbingHashMap::new(cap, constant_hash);
        run_scenario(&mut sut, &pool, ops, LoadBound::AtMost(0.5))?;
    }
}
