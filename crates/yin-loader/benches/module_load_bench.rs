//! Benchmarks for the three-pass module loader.
//!
//! Run with: cargo bench --bench module_load_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use yin_common::diagnostics::CollectingSink;
use yin_schema::Context;

const SMALL_MODULE: &str = r#"
<module name="small" xmlns="urn:ietf:params:xml:ns:yang:yin:1">
  <namespace uri="urn:x:small"/>
  <prefix value="sm"/>
  <container name="top">
    <leaf name="name">
      <type name="string"/>
    </leaf>
  </container>
</module>"#;

/// Generate a module with `count` sibling containers, each holding a
/// handful of leaves, to exercise the node builder's per-node allocation
/// path at scale.
fn generate_large_module(count: usize) -> String {
    let mut body = String::with_capacity(count * 200);
    for i in 0..count {
        body.push_str(&format!(
            r#"<container name="c{i}">
                 <leaf name="id"><type name="uint32"/></leaf>
                 <leaf name="name"><type name="string"/></leaf>
                 <leaf name="active"><type name="boolean"/></leaf>
               </container>"#
        ));
    }
    format!(
        r#"<module name="large" xmlns="urn:ietf:params:xml:ns:yang:yin:1">
             <namespace uri="urn:x:large"/>
             <prefix value="lg"/>
             {body}
           </module>"#
    )
}

fn bench_load_small_module(c: &mut Criterion) {
    c.bench_function("load_small_module", |b| {
        b.iter(|| {
            let mut ctx = Context::new(Box::new(CollectingSink::new()));
            let doc = yin_xml::parse(black_box(SMALL_MODULE)).unwrap();
            let id = yin_loader::load_module(&mut ctx, &doc.root()).unwrap();
            black_box(id);
        })
    });
}

fn bench_load_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("module_load_throughput");

    for size in [10, 100, 500].iter() {
        let xml = generate_large_module(*size);
        let bytes = xml.len() as u64;

        group.throughput(Throughput::Bytes(bytes));
        group.bench_with_input(BenchmarkId::from_parameter(size), &xml, |b, xml| {
            b.iter(|| {
                let mut ctx = Context::new(Box::new(CollectingSink::new()));
                let doc = yin_xml::parse(black_box(xml)).unwrap();
                let id = yin_loader::load_module(&mut ctx, &doc.root()).unwrap();
                black_box(id);
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_load_small_module, bench_load_throughput);
criterion_main!(benches);
