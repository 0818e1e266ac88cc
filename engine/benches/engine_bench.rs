use criterion::{black_box, criterion_group, criterion_main, Criterion};

use plenum_engine::{MajorityEvaluator, MajorityInput, QuorumEvaluator, QuorumResult};
use plenum_nullables::NullStore;
use plenum_types::{
    Context, MeetingId, QuorumBasis, QuorumMode, QuorumPolicy, TenantId, Timestamp, VoteBase,
    VotePolicy,
};

fn fixture() -> (NullStore, QuorumPolicy, VotePolicy) {
    let store = NullStore::new();
    store.set_attendance(MeetingId::new(1), TenantId::new(1), 750, 750.0);
    store.set_members(TenantId::new(1), 1000, 1000.0);
    let quorum_policy = QuorumPolicy {
        mode: QuorumMode::Double,
        basis: QuorumBasis::EligibleMembers,
        threshold: 0.5,
        threshold_call2: None,
        basis2: Some(QuorumBasis::EligibleWeight),
        threshold2: Some(0.66),
        include_proxies: true,
        count_remote: true,
    };
    let vote_policy = VotePolicy {
        base: VoteBase::Expressed,
        threshold: 0.5,
        abstention_as_against: false,
    };
    (store, quorum_policy, vote_policy)
}

fn bench_quorum_evaluation(c: &mut Criterion) {
    let (store, quorum_policy, _) = fixture();
    let ctx = Context::new(TenantId::new(1), Timestamp::new(10_000));
    let evaluator = QuorumEvaluator::new(&store, &store);

    c.bench_function("quorum_double_mode", |b| {
        b.iter(|| {
            black_box(
                evaluator
                    .evaluate(
                        black_box(&ctx),
                        MeetingId::new(1),
                        1,
                        Some(&quorum_policy),
                        None,
                    )
                    .unwrap(),
            )
        });
    });
}

fn bench_majority_evaluation(c: &mut Criterion) {
    let (_, _, vote_policy) = fixture();
    let input = MajorityInput {
        for_weight: 400.0,
        against_weight: 250.0,
        abstain_weight: 100.0,
        expressed_weight: 750.0,
        eligible_weight: 1000.0,
    };

    c.bench_function("majority_expressed_base", |b| {
        b.iter(|| {
            black_box(
                MajorityEvaluator
                    .evaluate(
                        black_box(&input),
                        Some(&vote_policy),
                        &QuorumResult::NotApplicable,
                    )
                    .unwrap(),
            )
        });
    });
}

criterion_group!(benches, bench_quorum_evaluation, bench_majority_evaluation);
criterion_main!(benches);
