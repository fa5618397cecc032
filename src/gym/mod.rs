pub mod grid_world;
pub mod student;

pub use grid_world::GridWorld;
pub use student::Student;
