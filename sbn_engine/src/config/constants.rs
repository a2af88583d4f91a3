pub mod compile_time {
    pub mod file_processing {
        /// Maximum file size allowed for processing (4MB)
        /// A season's worth of scorebooks stays far under this
        pub const MAX_FILE_SIZE: u64 = 4 * 1024 * 1024;

        /// Threshold for considering a file "large" (256KB)
        pub const LARGE_FILE_THRESHOLD: u64 = 256 * 1024;
    }

    pub mod lexical {
        /// Maximum number of tokens allowed in a single file
        pub const MAX_TOKEN_COUNT: usize = 200_000;

        /// Maximum trailing comment length per plate appearance
        pub const MAX_COMMENT_LENGTH: usize = 2_000;

        /// Maximum length of a single whitespace-delimited token
        pub const MAX_WORD_LENGTH: usize = 128;

        /// Maximum property value length in the header block
        pub const MAX_PROPERTY_LENGTH: usize = 1_024;
    }

    pub mod grammar {
        /// A document describes one game: visitor and home
        pub const MAX_TEAM_BLOCKS: usize = 2;

        /// Maximum event records per team block
        pub const MAX_EVENTS_PER_BLOCK: usize = 2_000;

        /// Maximum advance codes attached to one plate appearance
        pub const MAX_ADVANCES_PER_PLAY: usize = 4;

        /// Maximum accumulated grammar errors before parsing gives up
        pub const MAX_PARSE_ERRORS: usize = 100;
    }

    pub mod machine {
        /// Defensive ceiling on innings per side; a replay that seeds past
        /// this is cycling, not scoring
        pub const MAX_INNINGS: u8 = 50;

        /// Outs that close a half-inning
        pub const OUTS_PER_HALF: u8 = 3;

        /// Pitch-sequence marker appended when a ball-in-play code lacks one
        pub const BALL_IN_PLAY_PITCH: char = 'X';
    }

    pub mod batch_processing {
        /// Maximum files accepted from one directory walk
        pub const MAX_BATCH_FILES: usize = 10_000;

        /// Maximum worker threads for parallel batch replay
        pub const MAX_BATCH_THREADS: usize = 16;
    }
}
