use std;
use trackable;
use trackable::error::ErrorKindExt;

/// crate固有のエラー型.
#[derive(Debug, Clone, TrackableError)]
pub struct Error(trackable::error::TrackableError<ErrorKind>);
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        if let Some(e) = e.get_ref().and_then(|e| e.downcast_ref::<Error>()).cloned() {
            e
        } else if e.kind() == std::io::ErrorKind::InvalidInput {
            ErrorKind::InvalidInput.cause(e).into()
        } else {
            ErrorKind::Other.cause(e).into()
        }
    }
}
impl From<Error> for std::io::Error {
    fn from(e: Error) -> Self {
        if *e.kind() == ErrorKind::InvalidInput {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
        } else {
            std::io::Error::new(std::io::ErrorKind::Other, e)
        }
    }
}

/// 発生し得るエラーの種別.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// スロットストアに、要求サイズを満たす連続した空き領域が存在しない.
    ///
    /// 割当に失敗した場合でも、スロットの状態は一切変更されない.
    ///
    /// # 典型的な対応策
    ///
    /// - 利用者が不要なブロックを解放する
    /// - より大きな容量(`MAX_SLOTS`)でアロケータを構築し直す
    OutOfMemory,

    /// 入力が不正.
    ///
    /// スロットストアの範囲外を指すポインタや、不正な設定値が渡された場合にこのエラーが返される.
    ///
    /// # 典型的な対応策
    ///
    /// - 利用者側のプログラムを修正して入力を正しくする
    InvalidInput,

    /// その他エラー.
    ///
    /// E.g., 出力先へのI/Oエラー
    Other,
}
impl trackable::error::ErrorKind for ErrorKind {}

#[cfg(test)]
mod tests {
    use std::io;
    use trackable::error::ErrorKindExt;

    use super::*;

    #[test]
    fn io_error_conversion_keeps_kind() {
        let e: Error = ErrorKind::InvalidInput.cause("out of range").into();
        let io_error = io::Error::from(e);
        assert_eq!(io_error.kind(), io::ErrorKind::InvalidInput);

        let e = Error::from(io_error);
        assert_eq!(*e.kind(), ErrorKind::InvalidInput);

        let e = Error::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert_eq!(*e.kind(), ErrorKind::Other);
    }
}
