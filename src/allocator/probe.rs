//! Random-Probe Linear Scan.

/// 空き領域探索の結果.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ProbeOutcome {
    /// 見つかった空き領域の先頭(前方の番兵スロット)の位置.
    pub start: Option<usize>,

    /// 検査した候補開始位置の数.
    pub probes: usize,
}

/// `origin`を起点として、`window`スロット分連続した空き領域を探索する.
///
/// 候補開始位置は`(origin + offset) % used.len()`で循環的に選ばれるが、
/// 領域そのものが末尾を越えて先頭に回り込むことは許されない.
///
/// 候補位置から数えて`i`番目のスロットが使用中(あるいは範囲外)であることが分かった場合には、
/// 既に分かっている障害物を再検査しないよう、`offset`を`i + 1`だけ進める.
///
/// `offset`が容量に達した時点で、探索は失敗となる.
pub(crate) fn find_free_run(used: &[bool], origin: usize, window: usize) -> ProbeOutcome {
    let capacity = used.len();
    let mut offset = 0;
    let mut probes = 0;
    while offset < capacity {
        let start = (origin + offset) % capacity;
        probes += 1;
        if used[start] {
            offset += 1;
            continue;
        }

        let obstruction = (0..window).position(|i| {
            let end = start + i;
            end >= capacity || used[end]
        });
        match obstruction {
            None => {
                return ProbeOutcome {
                    start: Some(start),
                    probes,
                };
            }
            Some(i) => offset += i + 1,
        }
    }
    ProbeOutcome {
        start: None,
        probes,
    }
}
