use criterion::{black_box, criterion_group, criterion_main, Criterion};
use facpu::assembler;

const FIB: &str = include_str!("../asm/demo/fib.fas");

fn assemble_fib(c: &mut Criterion) {
    c.bench_function("assemble fib", |b| {
        b.iter(|| assembler::assemble(black_box(FIB)))
    });
}

fn assemble_large(c: &mut Criterion) {
    // Lots of macro expansion and forward references.
    let mut source = String::from("#define(STEP, ADD $1 $1 #col(0, 0, 255))\nJMP end\n");
    for i in 0..1000 {
        source.push_str(&format!("l{}: #STEP(R{})\n", i, i % 16));
    }
    source.push_str("end: HLT\n");

    c.bench_function("assemble 1000 lines", |b| {
        b.iter(|| assembler::assemble(black_box(&source)))
    });
}

criterion_group!(benches, assemble_fib, assemble_large);
criterion_main!(benches);
