//! Policy benchmarks. Run with: cargo bench --bench policy_bench
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;
use orgguard_core::config::AuthorizationConfig;
use orgguard_core::rbac::{Action, Membership, Operation, PermissionSet, PolicyEngine, Resource, ResourceKind, Role, RuleTable, Subject};
fn quiet_engine(memoize: bool) -> PolicyEngine { PolicyEngine::with_config(AuthorizationConfig { memoize_rule_tables: memoize, log_decisions: false }) }
fn bench_rule_tables(c: &mut Criterion) {
    let mut g = c.benchmark_group("policy_rule_tables"); g.measurement_time(Duration::from_secs(5));
    for role in Role::ALL {
        g.bench_with_input(BenchmarkId::new("build", role), &role, |b, &r| { b.iter(|| black_box(RuleTable::for_role(r))); });
    }
    g.bench_function("memoized_lookup", |b| { let engine = quiet_engine(true); b.iter(|| black_box(engine.rule_table(Role::Member))); });
    g.bench_function("unmemoized_lookup", |b| { let engine = quiet_engine(false); b.iter(|| black_box(engine.rule_table(Role::Member))); });
    g.finish();
}
fn bench_checks(c: &mut Criterion) {
    let mut g = c.benchmark_group("policy_checks"); g.measurement_time(Duration::from_secs(5));
    let member = PermissionSet::new(Subject::new("self", Role::Member));
    let own = Resource::project("p1", "self");
    let other = Resource::project("p2", "other-user");
    g.bench_function("kind_allow", |b| { b.iter(|| black_box(member.can(Action::Create, ResourceKind::Project))); });
    g.bench_function("kind_deny", |b| { b.iter(|| black_box(member.can(Action::Get, ResourceKind::Billing))); });
    g.bench_function("owner_allow", |b| { b.iter(|| black_box(member.can(Action::Delete, &own))); });
    g.bench_function("owner_deny", |b| { b.iter(|| black_box(member.can(Action::Delete, &other))); });
    g.bench_function("decide_with_reason", |b| { b.iter(|| black_box(member.decide(Action::Delete, &other))); });
    g.finish();
}
fn bench_guards(c: &mut Criterion) {
    let mut g = c.benchmark_group("policy_guards"); g.measurement_time(Duration::from_secs(5));
    let engine = quiet_engine(true);
    for &n in &[10usize, 100, 1000] {
        g.throughput(Throughput::Elements(n as u64));
        g.bench_with_input(BenchmarkId::new("authorize_members", n), &n, |b, &n| {
            let members: Vec<Membership> = (0..n).map(|i| Membership::new(format!("user-{i}"), "org1", Role::ALL[i % 3])).collect();
            let project = Resource::project("p1", "user-1");
            b.iter(|| { for m in &members { let _ = black_box(m.authorize(&engine, Operation::DeleteProject, Some(&project))); } });
        });
    }
    g.finish();
}
criterion_group!(benches, bench_rule_tables, bench_checks, bench_guards);
criterion_main!(benches);
