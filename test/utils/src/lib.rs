use std::env;

pub fn insta_snapshot<F: FnOnce()>(f: F) {
    let mut settings = insta::Settings::clone_current();
    let snapshot_path = env::current_dir().unwrap().join("./test/snapshots");
    settings.set_snapshot_path(snapshot_path);
    settings.bind(f);
}

/// Templates a competitive programmer keeps around, as `(name, code)` pairs.
pub fn template_fixtures() -> Vec<(&'static str, &'static str)> {
    return vec![
        (
            "Fast IO",
            r#"
#include <bits/stdc++.h>
using namespace std;

int main() {
    ios::sync_with_stdio(false);
    cin.tie(nullptr);
}
"#
            .trim(),
        ),
        (
            "Segment tree",
            r#"
struct SegTree {
    int n;
    vector<long long> t;
    SegTree(int n) : n(n), t(2 * n) {}
    void update(int p, long long v) {
        for (t[p += n] = v; p > 1; p >>= 1) t[p >> 1] = t[p] + t[p ^ 1];
    }
};
"#
            .trim(),
        ),
        ("Empty", ""),
    ];
}

/// A page fixture for the headless session, one command per line.
pub fn session_script_fixture() -> &'static str {
    return r#"
font 18
language python
type print(sum(map(int, input().split())))
submit
"#
    .trim();
}
