pub const FULL: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "+git.",
    env!("DAILYNOTES_GIT_COUNT"),
    ".",
    env!("DAILYNOTES_GIT_SHA"),
    env!("DAILYNOTES_GIT_DIRTY")
);
