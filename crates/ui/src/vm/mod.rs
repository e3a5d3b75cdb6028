mod intent;
mod screen_vm;

pub use intent::Intent;
pub use screen_vm::{
    ActionVm, BodyVm, ButtonStyle, CardVm, FaceLineVm, OptionVm, QuestionVm, ScreenVm,
    SummaryTilesVm, screen_vm,
};
