use crate::domain::entities::{Booking, BookingStatus};

/// One status column of the dispatch board.
#[derive(Debug, Clone, Default)]
pub struct StatusQueues {
    pub scheduled: Vec<Booking>,
    pub enroute: Vec<Booking>,
    pub on_site: Vec<Booking>,
    pub completed: Vec<Booking>,
}

impl StatusQueues {
    fn push(&mut self, booking: Booking) {
        match booking.status {
            BookingStatus::Scheduled => self.scheduled.push(booking),
            BookingStatus::Enroute => self.enroute.push(booking),
            BookingStatus::OnSite => self.on_site.push(booking),
            BookingStatus::Completed => self.completed.push(booking),
        }
    }

    pub fn counts(&self) -> [usize; 4] {
        [
            self.scheduled.len(),
            self.enroute.len(),
            self.on_site.len(),
            self.completed.len(),
        ]
    }

    pub fn total(&self) -> usize {
        self.counts().iter().sum()
    }
}

/// The full dispatcher view: bookings in the global region are visible to all
/// teams and shown apart from the team's own regional queue.
#[derive(Debug, Clone, Default)]
pub struct QueueBoard {
    pub global: StatusQueues,
    pub team: StatusQueues,
}

impl QueueBoard {
    pub fn partition(bookings: &[Booking]) -> QueueBoard {
        let mut board = QueueBoard::default();
        for booking in bookings {
            if booking.is_global() {
                board.global.push(booking.clone());
            } else {
                board.team.push(booking.clone());
            }
        }
        board
    }
}
