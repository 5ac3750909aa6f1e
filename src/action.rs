#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    StartRecording,
    StopRecording,
    ToggleHistory,
    CycleUnit,
    Navigate(Direction),
    ToggleHelp,
    None,
}
