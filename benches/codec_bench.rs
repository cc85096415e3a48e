//! Benchmarks for the queryline codec hot path

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use queryline::protocol::{escape, parse_reply, unescape, Command};

fn codec_benchmarks(c: &mut Criterion) {
    let plain = "virtualserver_name=TeamSpeak ]I[ Server";
    let escaped = "virtualserver_name=TeamSpeak\\s]I[\\sServer";
    let reply_line = "cid=1 channel_name=Lobby channel_order=0 total_clients=12\
        |cid=2 channel_name=AFK\\sArea channel_order=1 total_clients=3\
        |cid=3 channel_name=Talk channel_order=2 total_clients=7";

    c.bench_function("escape", |b| b.iter(|| escape(black_box(plain))));

    c.bench_function("unescape", |b| b.iter(|| unescape(black_box(escaped))));

    c.bench_function("parse_reply", |b| b.iter(|| parse_reply(black_box(reply_line))));

    c.bench_function("command_to_wire", |b| {
        let cmd = Command::new("clientkick")
            .flag("reasonid")
            .param("reasonmsg", "bye bye")
            .param("clid", vec![1i64, 2, 3, 4]);
        b.iter(|| black_box(&cmd).to_wire())
    });
}

criterion_group!(benches, codec_benchmarks);
criterion_main!(benches);
