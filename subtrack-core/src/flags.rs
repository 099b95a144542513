//! Attribute-presence bitmask for closed-caption style packets.

use bitflags::bitflags;

bitflags! {
    /// Which attributes a `SET_CC_ATTRIBUTES` packet carries. The value
    /// words that follow the mask appear in declaration order below.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CcAttributes: u32 {
        const FONT_COLOR         = 1 << 0;
        const BACKGROUND_COLOR   = 1 << 1;
        const FONT_OPACITY       = 1 << 2;
        const BACKGROUND_OPACITY = 1 << 3;
        const FONT_STYLE         = 1 << 4;
        const FONT_SIZE          = 1 << 5;
        const FONT_ITALIC        = 1 << 6;
        const FONT_UNDERLINE     = 1 << 7;
        const BORDER_TYPE        = 1 << 8;
        const BORDER_COLOR       = 1 << 9;
        const WIN_COLOR          = 1 << 10;
        const WIN_OPACITY        = 1 << 11;
        const EDGE_TYPE          = 1 << 12;
        const EDGE_COLOR         = 1 << 13;
    }
}
