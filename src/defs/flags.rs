use bitflags::bitflags;

bitflags! {
    /// Which sides of a body's box touched solid geometry during the last
    /// tick.  Rebuilt from scratch every tick by the integrator.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Contacts: u8 {
        // Vertical move downward was blocked (or the ground probe hit).
        const GROUND      = 0b0000_0001;
        // Vertical move upward was blocked.
        const CEILING     = 0b0000_0010;
        // Horizontal move toward −x was blocked.
        const WALL_LEFT   = 0b0000_0100;
        // Horizontal move toward +x was blocked.
        const WALL_RIGHT  = 0b0000_1000;

        const WALL        = Self::WALL_LEFT.bits() | Self::WALL_RIGHT.bits();
    }
}
