mod assemble_loop;
mod make_edge;
mod make_transition;

pub use assemble_loop::AssembleLoop;
pub use make_edge::MakeEdge;
pub use make_transition::MakeTransition;
