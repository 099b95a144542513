//! Closed-caption style attributes and their wire encoding.

use crate::flags::CcAttributes;
use crate::packet::PacketBuilder;

/// Sentinel meaning "attribute not set, keep the content default".
pub const STYLE_UNSET: u32 = u32::MAX;

/// Border color is not exposed through the session API; the wire value
/// is pinned to fully opaque black.
pub const BORDER_COLOR_SENTINEL: u32 = 0xFF00_0000;

/// A closed-caption style override as the session API exposes it.
///
/// Italic, underline and border type have no API surface here; they are
/// always transmitted as [`STYLE_UNSET`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CcStyle {
    pub font_color: u32,
    pub font_opacity: u32,
    pub font_style: u32,
    pub font_size: u32,
    pub edge_type: u32,
    pub edge_color: u32,
    pub background_color: u32,
    pub background_opacity: u32,
    pub window_color: u32,
    pub window_opacity: u32,
}

impl Default for CcStyle {
    fn default() -> Self {
        Self {
            font_color: STYLE_UNSET,
            font_opacity: STYLE_UNSET,
            font_style: STYLE_UNSET,
            font_size: STYLE_UNSET,
            edge_type: STYLE_UNSET,
            edge_color: STYLE_UNSET,
            background_color: STYLE_UNSET,
            background_opacity: STYLE_UNSET,
            window_color: STYLE_UNSET,
            window_opacity: STYLE_UNSET,
        }
    }
}

impl CcStyle {
    /// Encode the style into a `SET_CC_ATTRIBUTES` payload: one leading
    /// cc-type word, the attribute mask, then one value word per
    /// attribute in the mask's declaration order.
    pub fn encode(&self, bp: &mut PacketBuilder) {
        bp.push_u32(1); // cc type, carried but unused downstream
        bp.push_u32(CcAttributes::all().bits());
        bp.push_u32(self.font_color);
        bp.push_u32(self.background_color);
        bp.push_u32(self.font_opacity);
        bp.push_u32(self.background_opacity);
        bp.push_u32(self.font_style);
        bp.push_u32(self.font_size);
        bp.push_u32(STYLE_UNSET); // italic, not exposed
        bp.push_u32(STYLE_UNSET); // underline, not exposed
        bp.push_u32(STYLE_UNSET); // border type, not exposed
        bp.push_u32(BORDER_COLOR_SENTINEL);
        bp.push_u32(self.window_color);
        bp.push_u32(self.window_opacity);
        bp.push_u32(self.edge_type);
        bp.push_u32(self.edge_color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::PacketType;
    use crate::packet::Packet;

    #[test]
    fn encode_word_order_and_sentinels() {
        let style = CcStyle {
            font_color: 0x00FF_FFFF,
            font_opacity: 2,
            font_style: 1,
            font_size: 3,
            edge_type: 4,
            edge_color: 0x0080_8080,
            background_color: 0x0000_0000,
            background_opacity: 1,
            window_color: 0x0011_2233,
            window_opacity: 0,
        };
        let mut bp = PacketBuilder::new(PacketType::SetCcAttributes);
        style.encode(&mut bp);
        let packet = Packet::parse(&bp.finish()).unwrap();
        let mut rd = packet.reader();

        assert_eq!(rd.read_u32().unwrap(), 1); // cc type
        assert_eq!(rd.read_u32().unwrap(), CcAttributes::all().bits());
        assert_eq!(rd.read_u32().unwrap(), style.font_color);
        assert_eq!(rd.read_u32().unwrap(), style.background_color);
        assert_eq!(rd.read_u32().unwrap(), style.font_opacity);
        assert_eq!(rd.read_u32().unwrap(), style.background_opacity);
        assert_eq!(rd.read_u32().unwrap(), style.font_style);
        assert_eq!(rd.read_u32().unwrap(), style.font_size);
        assert_eq!(rd.read_u32().unwrap(), STYLE_UNSET); // italic
        assert_eq!(rd.read_u32().unwrap(), STYLE_UNSET); // underline
        assert_eq!(rd.read_u32().unwrap(), STYLE_UNSET); // border type
        assert_eq!(rd.read_u32().unwrap(), BORDER_COLOR_SENTINEL);
        assert_eq!(rd.read_u32().unwrap(), style.window_color);
        assert_eq!(rd.read_u32().unwrap(), style.window_opacity);
        assert_eq!(rd.read_u32().unwrap(), style.edge_type);
        assert_eq!(rd.read_u32().unwrap(), style.edge_color);
    }

    #[test]
    fn default_is_all_unset() {
        let style = CcStyle::default();
        assert_eq!(style.font_color, STYLE_UNSET);
        assert_eq!(style.window_opacity, STYLE_UNSET);
    }
}
