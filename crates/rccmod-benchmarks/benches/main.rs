use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use rccmod::prelude::*;

// Builds a flat synthetic archive: one root directory with `leaves` children,
// every child carrying a `payload`-byte body. Region layout matches the producer.
fn synthetic_regions(leaves: u32, payload: usize) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
	let mut names = Vec::new();
	let mut data = Vec::new();
	let mut tree = Vec::new();

	// root record
	tree.extend_from_slice(&0u32.to_be_bytes());
	tree.extend_from_slice(&Flags::DIRECTORY.to_be_bytes());
	tree.extend_from_slice(&leaves.to_be_bytes());
	tree.extend_from_slice(&1u32.to_be_bytes());
	tree.extend_from_slice(&0u64.to_be_bytes());

	let body = vec![0x5A_u8; payload];

	for index in 0..leaves {
		let name = format!("leaf-{:04}.bin", index);
		let name_offset = names.len() as u32;

		let units: Vec<u16> = name.encode_utf16().collect();
		names.extend_from_slice(&(units.len() as u16).to_be_bytes());
		names.extend_from_slice(&0u32.to_be_bytes());
		for unit in units {
			names.extend_from_slice(&unit.to_be_bytes());
		}

		let data_offset = data.len() as u32;
		data.extend_from_slice(&(body.len() as u32).to_be_bytes());
		data.extend_from_slice(&body);

		tree.extend_from_slice(&name_offset.to_be_bytes());
		tree.extend_from_slice(&0u16.to_be_bytes());
		tree.extend_from_slice(&0u32.to_be_bytes());
		tree.extend_from_slice(&data_offset.to_be_bytes());
		tree.extend_from_slice(&0u64.to_be_bytes());
	}

	(tree, names, data)
}

fn synthetic_root(leaves: u32, payload: usize) -> ResourceRoot<'static> {
	let (tree, names, data) = synthetic_regions(leaves, payload);
	ResourceRoot::from_regions(tree, names, data, 2).unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
	const LEAVES: u32 = 512;
	const PAYLOAD: usize = 1024;

	let root = synthetic_root(LEAVES, PAYLOAD);

	/* Walker benchmarks */
	let mut group = c.benchmark_group("walker");
	group.throughput(Throughput::Elements(LEAVES as u64 + 1));

	group.bench_function("walk", |b| {
		b.iter(|| {
			let mut visited = 0u64;
			root.walk(0, |_, path, _| {
				visited += black_box(path.len()) as u64;
				Ok(())
			})
			.unwrap();
			visited
		});
	});

	group.bench_function("stat", |b| {
		b.iter(|| root.stat(black_box(0)).unwrap());
	});

	group.bench_function("node_for_path", |b| {
		b.iter(|| root.node_for_path(black_box("leaf-0417.bin")).unwrap());
	});

	group.finish();

	/* Fetch benchmarks */
	let mut group = c.benchmark_group("fetch");
	group.throughput(Throughput::Bytes(PAYLOAD as u64));

	group.bench_function("fetch_node", |b| {
		b.iter(|| root.fetch_node(black_box(100)).unwrap());
	});

	group.finish();

	/* Commit benchmarks */
	let mut group = c.benchmark_group("commit");
	group.throughput(Throughput::Elements(16));

	group.bench_function("commit_16_replacements", |b| {
		b.iter_batched(
			|| {
				let root = synthetic_root(LEAVES, PAYLOAD);
				let mut ledger = ReplacementLedger::new();

				for node in 1..=16u32 {
					ledger.add(node, vec![node as u8; 256]);
				}

				(root, ledger)
			},
			|(mut root, mut ledger)| {
				let summary = commit(&mut root, &mut ledger, None).unwrap();
				assert_eq!(summary.applied, 16);
				root
			},
			BatchSize::SmallInput,
		);
	});

	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
