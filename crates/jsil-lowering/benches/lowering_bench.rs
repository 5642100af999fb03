//! Lowering Benchmark
//!
//! Measures pass throughput (members per second) for sequential and
//! parallel traversal.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use jsil_ir::sdk::{JS_UTIL_LIBRARY, names};
use jsil_ir::{
    Annotations, Expression, MemberSpec, Program, ProgramBuilder, Statement, Type, install_sdk,
};
use jsil_lowering::{InteropLowering, LoweringOptions};

// =============================================================================
// Program Generation
// =============================================================================

/// `libraries` libraries, each with `members` external interop members and
/// one body holding `members` checked calls.
fn generate_program(libraries: usize, members: usize) -> Program {
    let mut builder = ProgramBuilder::new();
    let sdk = install_sdk(&mut builder);
    let Some(call_method) = builder
        .program()
        .find_library(JS_UTIL_LIBRARY)
        .and_then(|library| library.find_member(names::CALL_METHOD))
        .map(|member| member.id)
    else {
        panic!("callMethod missing from the SDK");
    };

    for l in 0..libraries {
        let library = builder.add_library(
            format!("package:bench{l}"),
            Annotations::internal_js(format!("bench{l}")),
        );
        let class = builder.add_class(
            library,
            format!("Host{l}"),
            Annotations::js("").with_static_interop(),
        );
        for m in 0..members {
            let parameters = (0..m % 4)
                .map(|p| builder.variable(format!("p{p}"), sdk.string_type()))
                .collect();
            builder.add_class_member(
                class,
                MemberSpec::method(format!("op{m}"))
                    .external()
                    .static_member()
                    .parameters(parameters),
            );
        }

        let receiver = builder.variable("r", sdk.object_type());
        let value = builder.variable("v", sdk.string_type());
        let calls = (0..members)
            .map(|m| {
                Statement::expr(Expression::call_generic(
                    call_method,
                    vec![Type::Dynamic],
                    vec![
                        Expression::get(receiver.id),
                        Expression::string(format!("op{m}")),
                        Expression::list(Type::Dynamic, vec![Expression::get(value.id); m % 6]),
                    ],
                ))
            })
            .collect();
        builder.add_top_level(
            library,
            MemberSpec::method("main")
                .static_member()
                .parameters(vec![receiver, value])
                .body(Statement::block(calls)),
        );
    }
    builder.finish()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_lowering_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("lowering_throughput");
    for (libraries, members) in [(4, 16), (16, 16), (64, 32)] {
        let program = generate_program(libraries, members);
        let lowering = match InteropLowering::new(&program, LoweringOptions::default()) {
            Ok(lowering) => lowering,
            Err(error) => panic!("{error}"),
        };
        group.throughput(Throughput::Elements((libraries * members * 2) as u64));

        group.bench_with_input(
            BenchmarkId::new("sequential", format!("{libraries}x{members}")),
            &program,
            |b, program| {
                b.iter_batched(
                    || program.clone(),
                    |mut program| black_box(lowering.transform_program(&mut program)),
                    criterion::BatchSize::LargeInput,
                );
            },
        );
        group.bench_with_input(
            BenchmarkId::new("parallel", format!("{libraries}x{members}")),
            &program,
            |b, program| {
                b.iter_batched(
                    || program.clone(),
                    |mut program| black_box(lowering.transform_program_parallel(&mut program)),
                    criterion::BatchSize::LargeInput,
                );
            },
        );
    }
    group.finish();
}

fn bench_catalog_resolution(c: &mut Criterion) {
    let program = generate_program(16, 16);
    c.bench_function("catalog_resolution", |b| {
        b.iter(|| black_box(InteropLowering::new(black_box(&program), LoweringOptions::default())));
    });
}

criterion_group!(benches, bench_lowering_throughput, bench_catalog_resolution);
criterion_main!(benches);
