/// User actions that can be performed in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move selection up
    MoveUp,
    /// Move selection down
    MoveDown,
    /// Move selection up by a page
    PageUp,
    /// Move selection down by a page
    PageDown,
    /// Go to first item
    GoToFirst,
    /// Go to last item
    GoToLast,
    /// Scan the selected file
    StartScan,
    /// Cancel the running scan
    CancelScan,
    /// Remove the selected file from the upload list
    Remove,
    /// Remove every file
    ClearAll,
    /// Open the add-file prompt
    AddFile,
    /// Type a character into the prompt
    InputChar(char),
    /// Delete the last prompt character
    InputBackspace,
    /// Accept the prompt
    SubmitInput,
    /// Close the prompt without adding
    CancelInput,
    /// Switch between uploads and dashboard
    NextView,
    /// Show help overlay
    ShowHelp,
    /// Hide help overlay
    HideHelp,
    /// Quit the application
    Quit,
    /// No action (for tick events)
    Tick,
}
