pub mod get_movie_details;

pub use get_movie_details::GetMovieDetailsUseCase;
