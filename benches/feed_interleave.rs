//! Benchmarks for feed interleaving
//!
//! The interleaver runs once per feed page render. Pages are usually
//! tens of items, but the merge must stay linear so pathological pages
//! (prefetch-everything clients) cannot dominate a render.

use adweave::ad::Ad;
use adweave::feed::interleaver::{ContentItem, interleave};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn make_items(count: usize) -> Vec<ContentItem> {
    (0..count)
        .map(|i| ContentItem {
            id: format!("content-{}", i),
            title: format!("Content Item {}", i),
            media_url: format!("https://cdn.example.com/content-{}.mp4", i),
            poster_url: Some(format!("https://cdn.example.com/poster-{}.jpg", i)),
            views: (i as u64) * 37,
        })
        .collect()
}

fn make_ads(count: usize) -> Vec<Ad> {
    (0..count)
        .map(|i| Ad {
            id: format!("ad-{}", i),
            title: format!("Ad {}", i),
            description: Some("Sponsored".to_string()),
            video_url: format!("https://ads.example.com/creative-{}.mp4", i),
            is_skippable: i % 2 == 0,
            skip_after_secs: 5,
            duration_secs: 15,
        })
        .collect()
}

fn bench_interleave(c: &mut Criterion) {
    let mut group = c.benchmark_group("feed_interleave");
    let ads = make_ads(8);

    for item_count in [20, 200, 2000] {
        let items = make_items(item_count);
        group.bench_with_input(
            BenchmarkId::from_parameter(item_count),
            &items,
            |b, items| b.iter(|| interleave(black_box(items), black_box(&ads))),
        );
    }

    group.finish();
}

fn bench_interleave_ad_pool_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("feed_interleave_pool");
    let items = make_items(200);

    for ad_count in [0, 2, 16] {
        let ads = make_ads(ad_count);
        group.bench_with_input(BenchmarkId::from_parameter(ad_count), &ads, |b, ads| {
            b.iter(|| interleave(black_box(&items), black_box(ads)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_interleave, bench_interleave_ad_pool_sizes);
criterion_main!(benches);
