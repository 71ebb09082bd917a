use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use variant_tree::{
    read_scon, to_scon_string, vtree, IncludeDirs, SconWriterSettings, VariantTree,
};

fn service_tree(services: usize) -> VariantTree {
    let mut tree = VariantTree::new();
    for i in 0..services {
        let service = tree.push_back("service", VariantTree::with_data(format!("svc{}", i)));
        service.add("port", 8000 + i as i64);
        service.add("ratio", 0.5 + i as f64);
        service.add("enabled", i % 2 == 0);
        service.push_back(
            "limits",
            vtree!({ "cpu" => 2, "memory" => "512M", "burst" => 1.5 }),
        );
    }
    tree
}

fn benchmark_write_scon(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_scon");
    let settings = SconWriterSettings::default();

    for size in [10, 100, 1000].iter() {
        let tree = service_tree(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &tree, |b, tree| {
            b.iter(|| to_scon_string(black_box(tree), &settings))
        });
    }
    group.finish();
}

fn benchmark_read_scon(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_scon");
    let resolver = IncludeDirs::default();

    for size in [10, 100, 1000].iter() {
        let text = to_scon_string(&service_tree(*size), &SconWriterSettings::default());
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| {
                let mut tree = VariantTree::new();
                read_scon(black_box(text.as_bytes()), &mut tree, "bench.conf", &resolver)
            })
        });
    }
    group.finish();
}

fn benchmark_read_typed_scon(c: &mut Criterion) {
    let settings = SconWriterSettings::new().with_show_types(true);
    let text = to_scon_string(&service_tree(100), &settings);
    let resolver = IncludeDirs::default();

    c.bench_function("read_scon_with_types", |b| {
        b.iter(|| {
            let mut tree = VariantTree::new();
            read_scon(black_box(text.as_bytes()), &mut tree, "bench.conf", &resolver)
        })
    });
}

fn benchmark_path_lookup(c: &mut Criterion) {
    let mut tree = VariantTree::new();
    tree.put("a.b.c.d.e.f", 1);
    for i in 0..100 {
        tree.add(format!("sibling{}", i), i);
    }

    c.bench_function("get_deep_path", |b| {
        b.iter(|| tree.get::<i64>(black_box("a.b.c.d.e.f")))
    });
}

criterion_group!(
    benches,
    benchmark_write_scon,
    benchmark_read_scon,
    benchmark_read_typed_scon,
    benchmark_path_lookup
);
criterion_main!(benches);
